pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod memory;
pub mod model;

pub use client::{HttpTaskClient, TaskApi};
pub use config::ApiConfig;
pub use error::ApiError;
pub use form::{Field, FieldError, FieldErrors, TaskForm, TaskFormInput};
pub use memory::MemoryTaskApi;
pub use model::*;
