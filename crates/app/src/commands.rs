//! Async adapters that turn controller requests into task API calls.

use std::sync::Arc;

use taskdesk_core::TaskApi;
use tokio::sync::mpsc::UnboundedSender;

use crate::message::{ApiCall, Message, Request};

/// Run one request against `api` and wrap the outcome as the matching completion message.
pub async fn perform(api: &dyn TaskApi, request: Request) -> Message {
    let Request { id, call } = request;
    tracing::debug!(request = %id, call = call.label(), "issuing request");
    match call {
        ApiCall::ListTasks => Message::TasksLoaded(id, api.list_tasks().await),
        ApiCall::GetTask(task) => Message::TaskLoaded(id, api.get_task(task).await),
        ApiCall::CreateTask(payload) => Message::TaskSaved(id, api.create_task(payload).await),
        ApiCall::UpdateTask(task, payload) => {
            Message::TaskSaved(id, api.update_task(task, payload).await)
        }
        ApiCall::DeleteTask(task) => Message::TaskDeleted(id, api.delete_task(task).await),
    }
}

/// Spawns requests onto the current tokio runtime and posts completions back to the session.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn TaskApi>,
    tx: UnboundedSender<Message>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn TaskApi>, tx: UnboundedSender<Message>) -> Self {
        Self { api, tx }
    }

    /// Must be called from within a tokio runtime context.
    pub fn dispatch(&self, request: Request) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let message = perform(api.as_ref(), request).await;
            if tx.send(message).is_err() {
                tracing::debug!("session closed before the response arrived");
            }
        });
    }
}
