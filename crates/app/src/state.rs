//! Building blocks the screen controllers share: load phases, form submission and delete
//! confirmation.

use taskdesk_core::{ApiError, Field, Task, TaskForm, TaskId, TaskPayload};

use crate::message::{ApiCall, Effect, Request, RequestId, RequestIds};

pub const LOAD_TASKS_FAILED: &str = "Failed to load tasks. Please try again.";
pub const LOAD_TASK_FAILED: &str = "Failed to load task. Please try again.";
pub const CREATE_TASK_FAILED: &str = "Failed to create task. Please try again.";
pub const UPDATE_TASK_FAILED: &str = "Failed to update task. Please try again.";
pub const DELETE_TASK_FAILED: &str = "Failed to delete task. Please try again.";

/// Lifecycle of one screen's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Idle,
    Loading(RequestId),
    Loaded(T),
    Failed(String),
}

impl<T> Phase<T> {
    /// Move to `Loading` and describe the call, unless a load is already running.
    pub(crate) fn begin(&mut self, ids: &mut RequestIds, call: ApiCall) -> Effect {
        if self.is_loading() {
            tracing::debug!(call = call.label(), "load already in flight");
            return None;
        }
        let request = Request::new(ids, call);
        *self = Phase::Loading(request.id);
        Some(request)
    }

    /// Whether `id` is the load this phase is waiting for.
    pub(crate) fn awaits(&self, id: RequestId) -> bool {
        matches!(self, Phase::Loading(pending) if *pending == id)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Phase::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Phase::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What became of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The answer belongs to some other request.
    Stale,
    Saved(Task),
    Failed,
}

/// Form values plus the submit lifecycle shared by the create and edit screens.
#[derive(Debug, Clone)]
pub struct FormSession {
    form: TaskForm,
    submitting: Option<RequestId>,
    error: Option<String>,
}

impl FormSession {
    pub fn new(form: TaskForm) -> Self {
        Self {
            form,
            submitting: None,
            error: None,
        }
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_field(&mut self, field: Field, value: String) {
        if self.is_submitting() {
            return;
        }
        self.form.set(field, value);
    }

    pub(crate) fn touch(&mut self, field: Field) {
        self.form.touch(field);
    }

    /// Validate and, when valid, describe the save call built by `call`.
    ///
    /// An invalid form reveals every field error and issues nothing.
    pub(crate) fn submit(
        &mut self,
        ids: &mut RequestIds,
        call: impl FnOnce(TaskPayload) -> ApiCall,
    ) -> Effect {
        if self.is_submitting() {
            tracing::debug!("submit ignored while a save is in flight");
            return None;
        }

        match self.form.payload() {
            Ok(payload) => {
                let request = Request::new(ids, call(payload));
                self.error = None;
                self.submitting = Some(request.id);
                Some(request)
            }
            Err(errors) => {
                self.form.touch_all();
                tracing::debug!(invalid_fields = errors.len(), "submit blocked by validation");
                None
            }
        }
    }

    pub(crate) fn finish(
        &mut self,
        id: RequestId,
        result: Result<Task, ApiError>,
        failure_message: &str,
    ) -> SaveOutcome {
        if self.submitting != Some(id) {
            return SaveOutcome::Stale;
        }
        self.submitting = None;
        match result {
            Ok(task) => SaveOutcome::Saved(task),
            Err(err) => {
                tracing::warn!(error = %err, "saving task failed");
                self.error = Some(failure_message.to_string());
                SaveOutcome::Failed
            }
        }
    }
}

/// Delete confirmation and the single delete call that may follow it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    Confirming(TaskId),
    InFlight {
        request: RequestId,
        task: TaskId,
    },
}

impl DeleteFlow {
    /// Ask for confirmation before deleting `task`. Ignored while a delete is running.
    pub(crate) fn ask(&mut self, task: TaskId) -> bool {
        if matches!(self, DeleteFlow::InFlight { .. }) {
            return false;
        }
        *self = DeleteFlow::Confirming(task);
        true
    }

    pub(crate) fn cancel(&mut self) {
        if matches!(self, DeleteFlow::Confirming(_)) {
            *self = DeleteFlow::Idle;
        }
    }

    pub(crate) fn confirm(&mut self, ids: &mut RequestIds) -> Effect {
        let DeleteFlow::Confirming(task) = *self else {
            return None;
        };
        let request = Request::new(ids, ApiCall::DeleteTask(task));
        *self = DeleteFlow::InFlight {
            request: request.id,
            task,
        };
        Some(request)
    }

    /// Finish the delete answering `id`, returning which task it was for.
    pub(crate) fn settle(&mut self, id: RequestId) -> Option<TaskId> {
        match *self {
            DeleteFlow::InFlight { request, task } if request == id => {
                *self = DeleteFlow::Idle;
                Some(task)
            }
            _ => None,
        }
    }

    pub fn awaiting_confirmation(&self) -> Option<TaskId> {
        match self {
            DeleteFlow::Confirming(task) => Some(*task),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, DeleteFlow::InFlight { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdesk_core::TaskStatus;

    fn id(value: u64) -> TaskId {
        TaskId::new(value).unwrap()
    }

    #[test]
    fn phase_does_not_restart_a_running_load() {
        let mut ids = RequestIds::new();
        let mut phase: Phase<()> = Phase::Idle;

        let first = phase.begin(&mut ids, ApiCall::ListTasks).unwrap();
        assert!(phase.awaits(first.id));
        assert!(phase.begin(&mut ids, ApiCall::ListTasks).is_none());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut ids = RequestIds::new();
        let mut flow = DeleteFlow::default();

        assert!(flow.confirm(&mut ids).is_none());

        flow.ask(id(4));
        assert_eq!(flow.awaiting_confirmation(), Some(id(4)));
        let request = flow.confirm(&mut ids).unwrap();
        assert_eq!(request.call, ApiCall::DeleteTask(id(4)));
        assert!(flow.is_in_flight());

        assert!(!flow.ask(id(5)));
        assert_eq!(flow.settle(request.id), Some(id(4)));
        assert_eq!(flow, DeleteFlow::Idle);
    }

    #[test]
    fn cancelled_delete_issues_nothing() {
        let mut ids = RequestIds::new();
        let mut flow = DeleteFlow::default();
        flow.ask(id(1));
        flow.cancel();
        assert!(flow.confirm(&mut ids).is_none());
    }

    #[test]
    fn form_session_blocks_double_submit() {
        let mut ids = RequestIds::new();
        let mut session = FormSession::new(TaskForm::new());
        session.set_field(Field::Title, "Write".into());
        session.set_field(Field::Status, TaskStatus::Todo.as_str().into());

        let request = session.submit(&mut ids, ApiCall::CreateTask).unwrap();
        assert!(session.is_submitting());
        assert!(session.submit(&mut ids, ApiCall::CreateTask).is_none());

        session.set_field(Field::Title, "Changed mid-flight".into());
        assert_eq!(session.form().value(Field::Title), "Write");

        let outcome = session.finish(request.id, Err(ApiError::transport("down")), CREATE_TASK_FAILED);
        assert_eq!(outcome, SaveOutcome::Failed);
        assert_eq!(session.error(), Some(CREATE_TASK_FAILED));
        assert!(!session.is_submitting());
    }
}
