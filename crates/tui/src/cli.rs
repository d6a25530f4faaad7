use std::path::PathBuf;

use clap::{value_parser, Args, Parser, Subcommand};

use crate::model::TaskStatus;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskdesk",
    version,
    about = "Keyboard-first front-end for a remote task service.",
    after_help = "Examples:\n  taskdesk                       Launch the TUI (same as `taskdesk tui`)\n  taskdesk --demo tui --route /tasks/create\n  taskdesk list --status in-progress\n  taskdesk delete 12 --yes"
)]
pub struct Cli {
    /// Base URL of the task API (overrides TASKDESK_API_URL)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides TASKDESK_API_TIMEOUT, 0 disables)
    #[arg(long, value_name = "SECONDS", global = true, value_parser = value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Work against an in-memory store seeded with sample tasks instead of the API
    #[arg(long, global = true)]
    pub demo: bool,

    /// Tracing filter directive (e.g. "info", "taskdesk_core=debug"); RUST_LOG also applies
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui(TuiArgs),
    /// Print every task with per-status counts
    List(ListArgs),
    /// Print one task
    Show(ShowArgs),
    /// Delete a task by id
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TuiArgs {
    /// Screen to open first (e.g. /tasks, /tasks/create, /tasks/3/edit)
    #[arg(long, value_name = "PATH", default_value = "/tasks")]
    pub route: String,
}

impl Default for TuiArgs {
    fn default() -> Self {
        Self {
            route: "/tasks".to_string(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only print tasks with this status
    #[arg(long, value_enum)]
    pub status: Option<TaskStatus>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Task id
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Task id to delete
    #[arg(value_name = "ID")]
    pub id: String,

    /// Confirm the deletion; without it nothing is deleted
    #[arg(long)]
    pub yes: bool,
}
