//! Lightweight session telemetry, handy for checking how screens behave against a real backend.

#[cfg(feature = "telemetry")]
use std::collections::VecDeque;

#[cfg(feature = "telemetry")]
use parking_lot::Mutex;
use taskdesk_core::TaskId;

use crate::message::RequestId;

/// Events kept per session; older ones are discarded first.
pub const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ScreenEntered(String),
    LoadCompleted { screen: &'static str, count: usize },
    LoadFailed { screen: &'static str, error: String },
    SubmitFinished { screen: &'static str, task: Option<TaskId> },
    SubmitFailed { screen: &'static str, error: String },
    DeleteApplied(TaskId),
    DeleteFailed { task: TaskId, error: String },
    StaleResponseDropped { screen: &'static str, request: RequestId },
}

#[derive(Default)]
pub struct Handle {
    #[cfg(feature = "telemetry")]
    events: Mutex<VecDeque<Event>>,
}

impl Handle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        #[cfg(feature = "telemetry")]
        {
            match &event {
                Event::ScreenEntered(path) => {
                    tracing::debug!(path = path.as_str(), "telemetry screen entered")
                }
                Event::LoadCompleted { screen, count } => {
                    tracing::debug!(screen, count, "telemetry load completed")
                }
                Event::LoadFailed { screen, error } => {
                    tracing::debug!(screen, error = %error, "telemetry load failed")
                }
                Event::SubmitFinished { screen, task } => tracing::debug!(
                    screen,
                    task = task.map(|id| id.get()),
                    "telemetry submit finished"
                ),
                Event::SubmitFailed { screen, error } => {
                    tracing::debug!(screen, error = %error, "telemetry submit failed")
                }
                Event::DeleteApplied(id) => {
                    tracing::debug!(task = id.get(), "telemetry delete applied")
                }
                Event::DeleteFailed { task, error } => {
                    tracing::debug!(task = task.get(), error = %error, "telemetry delete failed")
                }
                Event::StaleResponseDropped { screen, request } => {
                    tracing::debug!(screen, request = %request, "telemetry stale response dropped")
                }
            }
            let mut events = self.events.lock();
            if events.len() == EVENT_CAPACITY {
                events.pop_front();
            }
            events.push_back(event);
        }
        #[cfg(not(feature = "telemetry"))]
        {
            let _ = event;
        }
    }

    pub fn is_enabled(&self) -> bool {
        cfg!(feature = "telemetry")
    }

    /// The most recent events, oldest first; always empty without the `telemetry` feature.
    pub fn events(&self) -> Vec<Event> {
        #[cfg(feature = "telemetry")]
        {
            self.events.lock().iter().cloned().collect()
        }
        #[cfg(not(feature = "telemetry"))]
        {
            Vec::new()
        }
    }
}
