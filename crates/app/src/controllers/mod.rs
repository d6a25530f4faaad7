//! One controller per screen. Each is a synchronous state machine: it consumes [`Message`]s and
//! answers with the remote call it wants issued, or a screen change.

mod create;
mod detail;
mod edit;
mod list;

pub use create::CreateScreen;
pub use detail::DetailScreen;
pub use edit::EditScreen;
pub use list::ListScreen;

use crate::message::{Effect, Request, RequestId, RequestIds};
use crate::routes::Route;
use crate::telemetry::{Event, Handle};

/// Result of feeding a message to a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Stay(Effect),
    Navigate(Route),
}

impl Transition {
    pub fn none() -> Self {
        Transition::Stay(None)
    }
}

impl From<Option<Request>> for Transition {
    fn from(effect: Effect) -> Self {
        Transition::Stay(effect)
    }
}

/// What a controller needs from the session while handling a message.
pub struct Context<'a> {
    pub(crate) ids: &'a mut RequestIds,
    pub(crate) telemetry: &'a Handle,
}

impl<'a> Context<'a> {
    pub fn new(ids: &'a mut RequestIds, telemetry: &'a Handle) -> Self {
        Self { ids, telemetry }
    }

    pub(crate) fn dropped(&self, screen: &'static str, request: RequestId) {
        tracing::debug!(screen, request = %request, "dropping late response");
        self.telemetry
            .record(Event::StaleResponseDropped { screen, request });
    }
}
