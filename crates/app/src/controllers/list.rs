use taskdesk_core::{ApiError, StatusCounts, Task, TaskStatus};

use super::{Context, Transition};
use crate::message::{ApiCall, Effect, Message, RequestId};
use crate::state::{DeleteFlow, Phase, DELETE_TASK_FAILED, LOAD_TASKS_FAILED};
use crate::telemetry::Event;

const SCREEN: &str = "list";

/// The task overview: every task, a status filter and delete-from-list.
#[derive(Debug, Clone)]
pub struct ListScreen {
    tasks: Phase<Vec<Task>>,
    filter: Option<TaskStatus>,
    delete: DeleteFlow,
    notice: Option<String>,
}

impl ListScreen {
    pub fn start(cx: &mut Context<'_>) -> (Self, Effect) {
        let mut screen = Self {
            tasks: Phase::Idle,
            filter: None,
            delete: DeleteFlow::Idle,
            notice: None,
        };
        let effect = screen.tasks.begin(cx.ids, ApiCall::ListTasks);
        (screen, effect)
    }

    pub fn tasks(&self) -> &Phase<Vec<Task>> {
        &self.tasks
    }

    pub fn filter(&self) -> Option<TaskStatus> {
        self.filter
    }

    pub fn delete_flow(&self) -> &DeleteFlow {
        &self.delete
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Tasks passing the status filter, in server order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .loaded()
            .map(|tasks| {
                tasks
                    .iter()
                    .filter(|task| self.filter.map_or(true, |status| task.status == status))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Per-status counts over every loaded task, ignoring the filter.
    pub fn counts(&self) -> Option<StatusCounts> {
        self.tasks.loaded().map(|tasks| StatusCounts::from_tasks(tasks))
    }

    pub fn update(&mut self, cx: &mut Context<'_>, message: Message) -> Transition {
        match message {
            Message::Retry => self.tasks.begin(cx.ids, ApiCall::ListTasks).into(),
            Message::FilterChanged(filter) => {
                self.filter = filter;
                Transition::none()
            }
            Message::DeleteRequested(id) => {
                self.notice = None;
                self.delete.ask(id);
                Transition::none()
            }
            Message::DeleteConfirmed => self.delete.confirm(cx.ids).into(),
            Message::DeleteCancelled => {
                self.delete.cancel();
                Transition::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Transition::none()
            }
            Message::TasksLoaded(id, result) => {
                self.finish_load(cx, id, result);
                Transition::none()
            }
            Message::TaskDeleted(id, result) => {
                self.finish_delete(cx, id, result);
                Transition::none()
            }
            other => {
                if let Some(id) = other.answers() {
                    cx.dropped(SCREEN, id);
                }
                Transition::none()
            }
        }
    }

    fn finish_load(&mut self, cx: &Context<'_>, id: RequestId, result: Result<Vec<Task>, ApiError>) {
        if !self.tasks.awaits(id) {
            cx.dropped(SCREEN, id);
            return;
        }
        match result {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "tasks loaded");
                cx.telemetry.record(Event::LoadCompleted {
                    screen: SCREEN,
                    count: tasks.len(),
                });
                self.tasks = Phase::Loaded(tasks);
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading tasks failed");
                cx.telemetry.record(Event::LoadFailed {
                    screen: SCREEN,
                    error: err.to_string(),
                });
                self.tasks = Phase::Failed(LOAD_TASKS_FAILED.to_string());
            }
        }
    }

    fn finish_delete(&mut self, cx: &Context<'_>, id: RequestId, result: Result<(), ApiError>) {
        let Some(task_id) = self.delete.settle(id) else {
            cx.dropped(SCREEN, id);
            return;
        };
        match result {
            Ok(()) => {
                if let Some(tasks) = self.tasks.loaded_mut() {
                    tasks.retain(|task| task.id != Some(task_id));
                }
                cx.telemetry.record(Event::DeleteApplied(task_id));
            }
            Err(err) => {
                tracing::warn!(task = %task_id, error = %err, "deleting task failed");
                cx.telemetry.record(Event::DeleteFailed {
                    task: task_id,
                    error: err.to_string(),
                });
                self.notice = Some(DELETE_TASK_FAILED.to_string());
            }
        }
    }
}
