//! Message and request definitions passed around the session update loop.

use std::fmt;

use taskdesk_core::{ApiError, Field, Task, TaskId, TaskPayload, TaskStatus};

use crate::routes::Route;

/// Session-unique tag for one issued remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing [`RequestId`]s.
#[derive(Debug, Default)]
pub struct RequestIds {
    last: u64,
}

impl RequestIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> RequestId {
        self.last = self.last.wrapping_add(1);
        RequestId(self.last)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListTasks,
    GetTask(TaskId),
    CreateTask(TaskPayload),
    UpdateTask(TaskId, TaskPayload),
    DeleteTask(TaskId),
}

impl ApiCall {
    pub fn label(&self) -> &'static str {
        match self {
            ApiCall::ListTasks => "list tasks",
            ApiCall::GetTask(_) => "get task",
            ApiCall::CreateTask(_) => "create task",
            ApiCall::UpdateTask(..) => "update task",
            ApiCall::DeleteTask(_) => "delete task",
        }
    }
}

/// A remote call a controller wants performed, tagged so its answer can be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub call: ApiCall,
}

impl Request {
    pub fn new(ids: &mut RequestIds, call: ApiCall) -> Self {
        Self {
            id: ids.next_id(),
            call,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Route),
    /// Re-run the current screen's load (also the list's refresh).
    Retry,
    FilterChanged(Option<TaskStatus>),
    FieldChanged(Field, String),
    FieldTouched(Field),
    Submit,
    DeleteRequested(TaskId),
    DeleteConfirmed,
    DeleteCancelled,
    DismissNotice,
    TasksLoaded(RequestId, Result<Vec<Task>, ApiError>),
    TaskLoaded(RequestId, Result<Task, ApiError>),
    TaskSaved(RequestId, Result<Task, ApiError>),
    TaskDeleted(RequestId, Result<(), ApiError>),
}

impl Message {
    /// The request a completion message answers, if it is one.
    pub fn answers(&self) -> Option<RequestId> {
        match self {
            Message::TasksLoaded(id, _)
            | Message::TaskLoaded(id, _)
            | Message::TaskSaved(id, _)
            | Message::TaskDeleted(id, _) => Some(*id),
            _ => None,
        }
    }
}

/// At most one remote call per user action or completion.
pub type Effect = Option<Request>;
