//! Front-end agnostic task screens: routing, per-screen controllers and request dispatch.

pub mod commands;
pub mod controllers;
pub mod message;
pub mod routes;
pub mod session;
pub mod state;
pub mod telemetry;


pub use commands::{perform, Dispatcher};
pub use controllers::{CreateScreen, DetailScreen, EditScreen, ListScreen, Transition};
pub use message::{ApiCall, Effect, Message, Request, RequestId};
pub use routes::Route;
pub use session::{Screen, Session};
pub use state::{DeleteFlow, FormSession, Phase};
