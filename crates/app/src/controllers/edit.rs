use taskdesk_core::{ApiError, Task, TaskForm, TaskId};

use super::{Context, Transition};
use crate::message::{ApiCall, Effect, Message, RequestId};
use crate::routes::Route;
use crate::state::{FormSession, Phase, SaveOutcome, LOAD_TASK_FAILED, UPDATE_TASK_FAILED};
use crate::telemetry::Event;

const SCREEN: &str = "edit";

/// Loads a task into the form, then saves changes back over it.
#[derive(Debug, Clone)]
pub struct EditScreen {
    id: TaskId,
    session: Phase<FormSession>,
}

impl EditScreen {
    pub fn start(cx: &mut Context<'_>, id: TaskId) -> (Self, Effect) {
        let mut screen = Self {
            id,
            session: Phase::Idle,
        };
        let effect = screen.session.begin(cx.ids, ApiCall::GetTask(id));
        (screen, effect)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn session(&self) -> &Phase<FormSession> {
        &self.session
    }

    pub fn update(&mut self, cx: &mut Context<'_>, message: Message) -> Transition {
        match message {
            Message::Retry => {
                if self.session.loaded().is_some() {
                    return Transition::none();
                }
                self.session.begin(cx.ids, ApiCall::GetTask(self.id)).into()
            }
            Message::FieldChanged(field, value) => {
                if let Some(session) = self.session.loaded_mut() {
                    session.set_field(field, value);
                }
                Transition::none()
            }
            Message::FieldTouched(field) => {
                if let Some(session) = self.session.loaded_mut() {
                    session.touch(field);
                }
                Transition::none()
            }
            Message::Submit => {
                let id = self.id;
                match self.session.loaded_mut() {
                    Some(session) => session
                        .submit(cx.ids, |payload| ApiCall::UpdateTask(id, payload))
                        .into(),
                    None => Transition::none(),
                }
            }
            Message::TaskLoaded(id, result) => {
                self.finish_load(cx, id, result);
                Transition::none()
            }
            Message::TaskSaved(id, result) => self.finish_save(cx, id, result),
            other => {
                if let Some(id) = other.answers() {
                    cx.dropped(SCREEN, id);
                }
                Transition::none()
            }
        }
    }

    fn finish_load(&mut self, cx: &Context<'_>, id: RequestId, result: Result<Task, ApiError>) {
        if !self.session.awaits(id) {
            cx.dropped(SCREEN, id);
            return;
        }
        match result {
            Ok(task) => {
                cx.telemetry.record(Event::LoadCompleted {
                    screen: SCREEN,
                    count: 1,
                });
                self.session = Phase::Loaded(FormSession::new(TaskForm::from_task(&task)));
            }
            Err(err) => {
                tracing::warn!(task = %self.id, error = %err, "loading task for edit failed");
                cx.telemetry.record(Event::LoadFailed {
                    screen: SCREEN,
                    error: err.to_string(),
                });
                self.session = Phase::Failed(LOAD_TASK_FAILED.to_string());
            }
        }
    }

    fn finish_save(&mut self, cx: &Context<'_>, id: RequestId, result: Result<Task, ApiError>) -> Transition {
        let Some(session) = self.session.loaded_mut() else {
            cx.dropped(SCREEN, id);
            return Transition::none();
        };
        let error = result.as_ref().err().map(ToString::to_string);
        match session.finish(id, result, UPDATE_TASK_FAILED) {
            SaveOutcome::Stale => {
                cx.dropped(SCREEN, id);
                Transition::none()
            }
            SaveOutcome::Saved(_) => {
                tracing::debug!(task = %self.id, "task updated");
                cx.telemetry.record(Event::SubmitFinished {
                    screen: SCREEN,
                    task: Some(self.id),
                });
                Transition::Navigate(Route::Detail(self.id))
            }
            SaveOutcome::Failed => {
                cx.telemetry.record(Event::SubmitFailed {
                    screen: SCREEN,
                    error: error.unwrap_or_default(),
                });
                Transition::none()
            }
        }
    }
}
