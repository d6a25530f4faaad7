use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::app::{DetailScreen, EditScreen, FormSession, ListScreen, Phase, Screen};
use crate::core::Field;
use crate::model::TaskStatus;
use crate::tui::constants::{
    APP_VERSION, HINT_CONFIRM_DELETE, HINT_DETAIL, HINT_FORM, HINT_GOTO, HINT_LIST,
    STATUS_LOADING, STATUS_RETRY, STATUS_SAVING,
};
use crate::tui::helpers::{
    accent_title, centered_rect, excerpt, format_opt_datetime, format_task_detail_entries,
    inset_rect, status_color, BG_ACCENT, BG_BASE, BG_PANEL, FG_ACCENT, FG_ERROR, FG_MUTED,
};

use super::{App, InputMode};

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(accent_title(title))
        .border_style(Style::default().fg(Color::DarkGray))
        .style(Style::default().bg(BG_PANEL))
}

fn error_lines(message: &str, retry: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(FG_ERROR).add_modifier(Modifier::BOLD),
    ))];
    if retry {
        lines.push(Line::from(Span::styled(
            STATUS_RETRY,
            Style::default().fg(FG_MUTED),
        )));
    }
    lines
}

fn muted(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(FG_MUTED)))
}

fn draw_list(
    f: &mut Frame<'_>,
    area: Rect,
    list: &ListScreen,
    selected: usize,
    table_state: &mut TableState,
) {
    let block = panel("All Tasks");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let tasks = match list.tasks() {
        Phase::Idle | Phase::Loading(_) => {
            f.render_widget(Paragraph::new(muted(STATUS_LOADING)), inner);
            return;
        }
        Phase::Failed(message) => {
            f.render_widget(Paragraph::new(error_lines(message, true)), inner);
            return;
        }
        Phase::Loaded(tasks) => tasks,
    };

    let rows_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let mut header = Vec::new();
    if let Some(counts) = list.counts().filter(|counts| counts.total() > 0) {
        let mut spans = vec![Span::styled(
            format!("Total: {}", counts.total()),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for status in TaskStatus::ALL {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{}: {}", status.label(), counts.get(status)),
                Style::default().fg(status_color(status)),
            ));
        }
        header.push(Line::from(spans));
    }
    let filter_label = list
        .filter()
        .map(|status| status.label())
        .unwrap_or("All");
    let mut filter_line = vec![Span::styled(
        format!("Filter: {}", filter_label),
        Style::default().fg(FG_MUTED),
    )];
    if let Some(notice) = list.notice() {
        filter_line.push(Span::raw("  "));
        filter_line.push(Span::styled(notice.to_string(), Style::default().fg(FG_ERROR)));
    }
    header.push(Line::from(filter_line));
    f.render_widget(Paragraph::new(header), rows_area[0]);

    if tasks.is_empty() {
        f.render_widget(
            Paragraph::new(vec![
                Line::from("No tasks yet."),
                muted("Press c to create your first task."),
            ]),
            rows_area[1],
        );
        return;
    }

    let visible = list.visible_tasks();
    if visible.is_empty() {
        f.render_widget(
            Paragraph::new(muted("No tasks match this filter. Press f to change it.")),
            rows_area[1],
        );
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|task| {
            Row::new(vec![
                Cell::from(task.id.map(|id| id.to_string()).unwrap_or_default()),
                Cell::from(task.status.label()).style(Style::default().fg(status_color(task.status))),
                Cell::from(task.title.clone()),
                Cell::from(excerpt(task.description.as_deref().unwrap_or_default()))
                    .style(Style::default().fg(FG_MUTED)),
                Cell::from(format_opt_datetime(task.due_date.as_ref())),
                Cell::from(format_opt_datetime(task.created_at.as_ref()))
                    .style(Style::default().fg(FG_MUTED)),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Percentage(25),
        Constraint::Min(10),
        Constraint::Length(16),
        Constraint::Length(16),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["ID", "Status", "Title", "Description", "Due", "Created"])
                .style(Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD)),
        )
        .highlight_style(
            Style::default()
                .bg(BG_ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");
    table_state.select(Some(selected.min(visible.len() - 1)));
    f.render_stateful_widget(table, rows_area[1], table_state);
}

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_body(f, chunks[1]);
        self.draw_footer(f, chunks[2]);

        if self.input_mode == InputMode::GoTo {
            self.draw_goto_overlay(f, size);
        } else if self.pending_delete() {
            self.draw_confirm_overlay(f, size);
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let route = self.route();
        let line = Line::from(vec![
            Span::styled(
                format!(" taskdesk v{} ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("— {}", route.title())),
            Span::raw("  "),
            Span::styled(route.path(), Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(
            Paragraph::new(line).style(Style::default().bg(BG_BASE)),
            area,
        );
    }

    fn draw_body(&mut self, f: &mut Frame<'_>, area: Rect) {
        match self.session.screen() {
            Screen::List(list) => draw_list(f, area, list, self.selected, &mut self.table_state),
            Screen::Detail(detail) => self.draw_detail(f, area, detail),
            Screen::Create(create) => self.draw_form(f, area, "Create Task", Some(create.session())),
            Screen::Edit(edit) => self.draw_edit(f, area, edit),
        }
    }

    fn draw_detail(&self, f: &mut Frame<'_>, area: Rect, detail: &DetailScreen) {
        let block = panel("Task Details");
        let inner = inset_rect(block.inner(area), 1);
        f.render_widget(block, area);

        let task = match detail.task() {
            Phase::Idle | Phase::Loading(_) => {
                f.render_widget(Paragraph::new(muted(STATUS_LOADING)), inner);
                return;
            }
            Phase::Failed(message) => {
                f.render_widget(Paragraph::new(error_lines(message, true)), inner);
                return;
            }
            Phase::Loaded(task) => task,
        };

        let mut lines: Vec<Line> = format_task_detail_entries(task)
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<13}", label),
                        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value),
                ])
            })
            .collect();
        if let Some(notice) = detail.notice() {
            lines.push(Line::default());
            lines.extend(error_lines(notice, false));
        }
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn draw_edit(&self, f: &mut Frame<'_>, area: Rect, edit: &EditScreen) {
        match edit.session() {
            Phase::Loaded(session) => self.draw_form(f, area, "Edit Task", Some(session)),
            Phase::Failed(message) => {
                let block = panel("Edit Task");
                let inner = inset_rect(block.inner(area), 1);
                f.render_widget(block, area);
                f.render_widget(Paragraph::new(error_lines(message, true)), inner);
            }
            Phase::Idle | Phase::Loading(_) => self.draw_form(f, area, "Edit Task", None),
        }
    }

    fn draw_form(&self, f: &mut Frame<'_>, area: Rect, title: &str, session: Option<&FormSession>) {
        let block = panel(title);
        let inner = inset_rect(block.inner(area), 1);
        f.render_widget(block, area);

        let Some(session) = session else {
            f.render_widget(Paragraph::new(muted(STATUS_LOADING)), inner);
            return;
        };
        let form = session.form();

        let mut lines = Vec::new();
        let mut cursor = None;
        for field in Field::ALL {
            let focused = field == self.editor.focus;
            let marker = if field.is_required() { " *" } else { "" };
            let label_style = if focused {
                Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(FG_MUTED)
            };
            lines.push(Line::from(Span::styled(
                format!("{}{}", field.label(), marker),
                label_style,
            )));

            let value = form.value(field);
            let shown = match field {
                Field::Status => value
                    .parse::<TaskStatus>()
                    .map(|status| format!("◀ {} ▶", status.label()))
                    .unwrap_or_else(|_| String::from("◀ select a status ▶")),
                _ => value.to_string(),
            };
            let value_style = if focused {
                Style::default().bg(BG_ACCENT)
            } else {
                Style::default()
            };
            if focused && field != Field::Status {
                let column = if self.editor.buffer.as_str() == value {
                    self.editor.buffer.cursor_column()
                } else {
                    value.chars().count()
                };
                cursor = Some((lines.len(), column));
            }
            lines.push(Line::from(Span::styled(format!("  {}", shown), value_style)));

            match form.visible_error(field) {
                Some(err) => lines.push(Line::from(Span::styled(
                    format!("  {}", err),
                    Style::default().fg(FG_ERROR),
                ))),
                None => lines.push(Line::default()),
            }
        }

        if session.is_submitting() {
            lines.push(muted(STATUS_SAVING));
        } else if let Some(error) = session.error() {
            lines.extend(error_lines(error, false));
        }

        f.render_widget(Paragraph::new(lines), inner);
        if let Some((row, column)) = cursor {
            let x = inner.x.saturating_add(2).saturating_add(column as u16);
            let y = inner.y.saturating_add(row as u16);
            if x < inner.right() && y < inner.bottom() {
                f.set_cursor(x, y);
            }
        }
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let hint = match self.session.screen() {
            Screen::List(_) => HINT_LIST,
            Screen::Detail(_) => HINT_DETAIL,
            Screen::Create(_) | Screen::Edit(_) => HINT_FORM,
        };
        let status = match &self.status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.style())),
            None => Line::default(),
        };
        let lines = vec![muted(hint), status];
        f.render_widget(
            Paragraph::new(lines).style(Style::default().bg(BG_BASE)),
            area,
        );
    }

    fn draw_goto_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let popup = centered_rect(60, 5, area);
        f.render_widget(Clear, popup);
        let block = panel("Go to");
        let inner = block.inner(popup);
        f.render_widget(block, popup);
        let lines = vec![Line::from(self.path_input.as_str().to_string()), muted(HINT_GOTO)];
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        let x = inner
            .x
            .saturating_add(self.path_input.cursor_column() as u16);
        if x < inner.right() {
            f.set_cursor(x, inner.y);
        }
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let popup = centered_rect(44, 5, area);
        f.render_widget(Clear, popup);
        let block = panel("Confirm");
        let inner = block.inner(popup);
        f.render_widget(block, popup);
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Delete this task?",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                muted(HINT_CONFIRM_DELETE),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
            inner,
        );
    }
}
