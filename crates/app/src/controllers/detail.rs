use taskdesk_core::{ApiError, Task, TaskId};

use super::{Context, Transition};
use crate::message::{ApiCall, Effect, Message, RequestId};
use crate::routes::Route;
use crate::state::{DeleteFlow, Phase, DELETE_TASK_FAILED, LOAD_TASK_FAILED};
use crate::telemetry::Event;

const SCREEN: &str = "detail";

/// One task, read-only, with delete.
#[derive(Debug, Clone)]
pub struct DetailScreen {
    id: TaskId,
    task: Phase<Task>,
    delete: DeleteFlow,
    notice: Option<String>,
}

impl DetailScreen {
    pub fn start(cx: &mut Context<'_>, id: TaskId) -> (Self, Effect) {
        let mut screen = Self {
            id,
            task: Phase::Idle,
            delete: DeleteFlow::Idle,
            notice: None,
        };
        let effect = screen.task.begin(cx.ids, ApiCall::GetTask(id));
        (screen, effect)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn task(&self) -> &Phase<Task> {
        &self.task
    }

    pub fn delete_flow(&self) -> &DeleteFlow {
        &self.delete
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn update(&mut self, cx: &mut Context<'_>, message: Message) -> Transition {
        match message {
            Message::Retry => self.task.begin(cx.ids, ApiCall::GetTask(self.id)).into(),
            // Only a task that is on screen can be deleted.
            Message::DeleteRequested(id) if id == self.id && self.task.loaded().is_some() => {
                self.notice = None;
                self.delete.ask(id);
                Transition::none()
            }
            Message::DeleteConfirmed if self.task.loaded().is_some() => self.delete.confirm(cx.ids).into(),
            Message::DeleteCancelled => {
                self.delete.cancel();
                Transition::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Transition::none()
            }
            Message::TaskLoaded(id, result) => {
                self.finish_load(cx, id, result);
                Transition::none()
            }
            Message::TaskDeleted(id, result) => self.finish_delete(cx, id, result),
            other => {
                if let Some(id) = other.answers() {
                    cx.dropped(SCREEN, id);
                }
                Transition::none()
            }
        }
    }

    fn finish_load(&mut self, cx: &Context<'_>, id: RequestId, result: Result<Task, ApiError>) {
        if !self.task.awaits(id) {
            cx.dropped(SCREEN, id);
            return;
        }
        match result {
            Ok(task) => {
                cx.telemetry.record(Event::LoadCompleted {
                    screen: SCREEN,
                    count: 1,
                });
                self.task = Phase::Loaded(task);
            }
            Err(err) => {
                tracing::warn!(task = %self.id, error = %err, "loading task failed");
                cx.telemetry.record(Event::LoadFailed {
                    screen: SCREEN,
                    error: err.to_string(),
                });
                self.task = Phase::Failed(LOAD_TASK_FAILED.to_string());
            }
        }
    }

    fn finish_delete(&mut self, cx: &Context<'_>, id: RequestId, result: Result<(), ApiError>) -> Transition {
        let Some(task_id) = self.delete.settle(id) else {
            cx.dropped(SCREEN, id);
            return Transition::none();
        };
        match result {
            Ok(()) => {
                cx.telemetry.record(Event::DeleteApplied(task_id));
                Transition::Navigate(Route::List)
            }
            Err(err) => {
                tracing::warn!(task = %task_id, error = %err, "deleting task failed");
                cx.telemetry.record(Event::DeleteFailed {
                    task: task_id,
                    error: err.to_string(),
                });
                self.notice = Some(DELETE_TASK_FAILED.to_string());
                Transition::none()
            }
        }
    }
}
