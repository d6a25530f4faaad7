use thiserror::Error;

use crate::model::TaskId;

/// Failures the remote task client reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The remote system rejected the payload; the user has to correct the input.
    #[error("Task rejected: {message}")]
    Validation { message: String },
    #[error("Task {id} not found")]
    NotFound { id: TaskId },
    /// Connectivity problems, unexpected statuses and undecodable bodies.
    #[error("Transport failure: {message}")]
    Transport { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("could not connect: {}", err)
        } else if err.is_decode() {
            format!("unreadable response body: {}", err)
        } else {
            err.to_string()
        };
        ApiError::Transport { message }
    }
}
