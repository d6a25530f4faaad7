use std::fmt;
use std::io::Write;

use anyhow::{anyhow, bail, Context, Result};
use tokio::runtime::Runtime;

use crate::app::state::{DELETE_TASK_FAILED, LOAD_TASKS_FAILED, LOAD_TASK_FAILED};
use crate::cli::{CliCommand, DeleteArgs, ListArgs, ShowArgs};
use crate::core::TaskApi;
use crate::model::{StatusCounts, Task, TaskId, TaskStatus};
use crate::tui::helpers::{format_opt_datetime, format_task_detail_entries};

pub fn execute<W: Write>(api: &dyn TaskApi, command: CliCommand, mut writer: W) -> Result<()> {
    let runtime = runtime()?;
    match command {
        CliCommand::List(args) => handle_list(&runtime, api, &args, &mut writer),
        CliCommand::Show(args) => handle_show(&runtime, api, &args, &mut writer),
        CliCommand::Delete(args) => handle_delete(&runtime, api, &args, &mut writer),
        CliCommand::Tui(_) => Err(anyhow!("launch the terminal UI directly")),
    }
}

pub(crate) fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn parse_id(raw: &str) -> Result<TaskId> {
    raw.parse::<TaskId>()
        .map_err(|_| anyhow!("Invalid task id '{}': expected a positive integer", raw.trim()))
}

fn handle_list<W: Write>(runtime: &Runtime, api: &dyn TaskApi, args: &ListArgs, mut writer: W) -> Result<()> {
    let tasks = runtime.block_on(api.list_tasks()).map_err(|err| {
        tracing::warn!(error = %err, "listing tasks failed");
        anyhow::Error::new(err).context(LOAD_TASKS_FAILED)
    })?;

    let visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| args.status.map_or(true, |status| task.status == status))
        .collect();

    if visible.is_empty() {
        writeln!(writer, "No tasks found.")?;
    } else {
        writeln!(writer, "{:>5}  {:<12} {:<17} TITLE", "ID", "STATUS", "DUE")?;
        for task in &visible {
            writeln!(
                writer,
                "{:>5}  {:<12} {:<17} {}",
                task.id.map(|id| id.to_string()).unwrap_or_default(),
                task.status.label(),
                format_opt_datetime(task.due_date.as_ref()),
                task.title
            )?;
        }
    }

    if !tasks.is_empty() {
        writeln!(writer, "{}", CountsLine(StatusCounts::from_tasks(&tasks)))?;
    }
    Ok(())
}

fn handle_show<W: Write>(runtime: &Runtime, api: &dyn TaskApi, args: &ShowArgs, mut writer: W) -> Result<()> {
    let id = parse_id(&args.id)?;
    let task = runtime.block_on(api.get_task(id)).map_err(|err| {
        tracing::warn!(task = %id, error = %err, "loading task failed");
        anyhow::Error::new(err).context(LOAD_TASK_FAILED)
    })?;

    let entries = format_task_detail_entries(&task);
    let width = entries.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in entries {
        writeln!(writer, "{:<width$}  {}", label, value, width = width)?;
    }
    Ok(())
}

fn handle_delete<W: Write>(runtime: &Runtime, api: &dyn TaskApi, args: &DeleteArgs, mut writer: W) -> Result<()> {
    let id = parse_id(&args.id)?;
    if !args.yes {
        bail!("Refusing to delete task {} without --yes", id);
    }
    runtime.block_on(api.delete_task(id)).map_err(|err| {
        tracing::warn!(task = %id, error = %err, "deleting task failed");
        anyhow::Error::new(err).context(DELETE_TASK_FAILED)
    })?;
    writeln!(writer, "Deleted task {}", id)?;
    Ok(())
}

struct CountsLine(StatusCounts);

impl fmt::Display for CountsLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.total();
        write!(f, "{} task{}", total, if total == 1 { "" } else { "s" })?;
        for status in TaskStatus::ALL {
            write!(f, " · {}: {}", status.label(), self.0.get(status))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ApiError, MemoryTaskApi};
    use crate::model::TaskPayload;

    fn seeded() -> (MemoryTaskApi, Task) {
        let api = MemoryTaskApi::new();
        let task = api.seed(TaskPayload {
            title: "Review code".into(),
            description: Some("Look at the open pull requests".into()),
            status: TaskStatus::Todo,
            due_date: None,
        });
        api.seed(TaskPayload {
            title: "Deploy".into(),
            description: None,
            status: TaskStatus::Done,
            due_date: None,
        });
        (api, task)
    }

    fn run(api: &MemoryTaskApi, command: CliCommand) -> Result<String> {
        let mut output = Vec::new();
        execute(api, command, &mut output)?;
        Ok(String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn list_prints_rows_and_counts() {
        let (api, _) = seeded();
        let output = run(&api, CliCommand::List(ListArgs { status: None })).unwrap();

        assert!(output.contains("Review code"));
        assert!(output.contains("Deploy"));
        assert!(output.contains("2 tasks · To Do: 1 · In Progress: 0 · Done: 1"));
    }

    #[test]
    fn list_filter_keeps_counts_over_everything() {
        let (api, _) = seeded();
        let output = run(
            &api,
            CliCommand::List(ListArgs {
                status: Some(TaskStatus::Done),
            }),
        )
        .unwrap();

        assert!(!output.contains("Review code"));
        assert!(output.contains("Deploy"));
        assert!(output.contains("2 tasks"));
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let api = MemoryTaskApi::new();
        let output = run(&api, CliCommand::List(ListArgs { status: None })).unwrap();
        assert_eq!(output, "No tasks found.\n");
    }

    #[test]
    fn list_failure_uses_the_flat_message() {
        let api = MemoryTaskApi::new();
        api.fail_next(ApiError::transport("connection refused"));
        let err = run(&api, CliCommand::List(ListArgs { status: None })).unwrap_err();
        assert_eq!(err.to_string(), LOAD_TASKS_FAILED);
    }

    #[test]
    fn show_prints_fields() {
        let (api, task) = seeded();
        let id = task.id.unwrap().to_string();
        let output = run(&api, CliCommand::Show(ShowArgs { id })).unwrap();

        assert!(output.contains("Review code"));
        assert!(output.contains("To Do"));
        assert!(output.contains("No due date set"));
        assert!(output.contains("Look at the open pull requests"));
    }

    #[test]
    fn show_missing_task_fails() {
        let api = MemoryTaskApi::new();
        let err = run(&api, CliCommand::Show(ShowArgs { id: "42".into() })).unwrap_err();
        assert_eq!(err.to_string(), LOAD_TASK_FAILED);
    }

    #[test]
    fn show_rejects_bad_ids_before_calling_out() {
        let api = MemoryTaskApi::new();
        assert!(run(&api, CliCommand::Show(ShowArgs { id: "abc".into() })).is_err());
        assert_eq!(api.calls(), 0);
    }

    #[test]
    fn delete_requires_confirmation() {
        let (api, task) = seeded();
        let id = task.id.unwrap().to_string();

        let err = run(
            &api,
            CliCommand::Delete(DeleteArgs {
                id: id.clone(),
                yes: false,
            }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--yes"));
        assert_eq!(api.len(), 2);

        let output = run(&api, CliCommand::Delete(DeleteArgs { id: id.clone(), yes: true })).unwrap();
        assert_eq!(output, format!("Deleted task {}\n", id));
        assert_eq!(api.len(), 1);
    }
}
