pub use taskdesk_tui::cli;
pub use taskdesk_tui::commands;
pub use taskdesk_tui::config;
pub use taskdesk_tui::tui;
pub use taskdesk_tui::ApiConfig;

pub use taskdesk_app as app;
pub use taskdesk_app::Route;

pub use taskdesk_core as core;
pub use taskdesk_core::model;
