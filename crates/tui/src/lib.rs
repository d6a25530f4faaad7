pub mod cli;
pub mod commands;
pub mod config;
pub mod tui;

pub use taskdesk_app as app;
pub use taskdesk_core as core;
pub use taskdesk_core::model;

pub use taskdesk_core::ApiConfig;
