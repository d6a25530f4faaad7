use std::cmp::min;

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{Task, TaskStatus};

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);
pub const FG_MUTED: Color = Color::Rgb(130, 138, 153);
pub const FG_ERROR: Color = Color::Rgb(240, 113, 120);

const EXCERPT_LIMIT: usize = 100;

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

/// First 100 characters of a description, with `...` when cut.
pub fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_LIMIT).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Rgb(242, 201, 76),
        TaskStatus::InProgress => FG_ACCENT,
        TaskStatus::Done => Color::Rgb(111, 207, 151),
    }
}

pub fn format_opt_datetime(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|dt| {
            let local: DateTime<Local> = (*dt).into();
            local.format("%Y-%m-%d %H:%M").to_string()
        })
        .unwrap_or_default()
}

pub fn format_due(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(_) => format_opt_datetime(value),
        None => String::from("No due date set"),
    }
}

pub fn format_task_detail_entries(task: &Task) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    entries.push((String::from("Title"), task.title.clone()));
    entries.push((String::from("Status"), task.status.label().to_string()));
    if let Some(id) = task.id {
        entries.push((String::from("ID"), id.to_string()));
    }
    entries.push((String::from("Due"), format_due(task.due_date.as_ref())));
    if task.created_at.is_some() {
        entries.push((
            String::from("Created"),
            format_opt_datetime(task.created_at.as_ref()),
        ));
    }
    if task.was_edited() {
        entries.push((
            String::from("Last updated"),
            format_opt_datetime(task.updated_at.as_ref()),
        ));
    }
    if let Some(description) = &task.description {
        if !description.trim().is_empty() {
            entries.push((String::from("Description"), description.clone()));
        }
    }
    entries
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
