use taskdesk_core::{ApiError, Task, TaskForm};

use super::{Context, Transition};
use crate::message::{ApiCall, Message, RequestId};
use crate::routes::Route;
use crate::state::{FormSession, SaveOutcome, CREATE_TASK_FAILED};
use crate::telemetry::Event;

const SCREEN: &str = "create";

/// A blank task form; a successful save returns to the list.
#[derive(Debug, Clone)]
pub struct CreateScreen {
    session: FormSession,
}

impl Default for CreateScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateScreen {
    pub fn new() -> Self {
        Self {
            session: FormSession::new(TaskForm::new()),
        }
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn update(&mut self, cx: &mut Context<'_>, message: Message) -> Transition {
        match message {
            Message::FieldChanged(field, value) => {
                self.session.set_field(field, value);
                Transition::none()
            }
            Message::FieldTouched(field) => {
                self.session.touch(field);
                Transition::none()
            }
            Message::Submit => self.session.submit(cx.ids, ApiCall::CreateTask).into(),
            Message::TaskSaved(id, result) => self.finish(cx, id, result),
            other => {
                if let Some(id) = other.answers() {
                    cx.dropped(SCREEN, id);
                }
                Transition::none()
            }
        }
    }

    fn finish(&mut self, cx: &Context<'_>, id: RequestId, result: Result<Task, ApiError>) -> Transition {
        let error = result.as_ref().err().map(ToString::to_string);
        match self.session.finish(id, result, CREATE_TASK_FAILED) {
            SaveOutcome::Stale => {
                cx.dropped(SCREEN, id);
                Transition::none()
            }
            SaveOutcome::Saved(task) => {
                tracing::debug!(task = ?task.id, "task created");
                cx.telemetry.record(Event::SubmitFinished {
                    screen: SCREEN,
                    task: task.id,
                });
                Transition::Navigate(Route::List)
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
