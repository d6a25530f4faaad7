use std::time::{Duration, Instant};

use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;

use super::buffer::TextBuffer;
use super::constants::{STATUS_TASK_DELETED, STATUS_TASK_SAVED, STATUS_TTL};
use crate::app::{FormSession, Message, Request, Route, Screen, Session};
use crate::core::Field;
use crate::model::{Task, TaskId};

mod input;
mod render;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    GoTo,
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }

    fn expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

/// Cursor-aware editing of the focused form field; the session form holds the values.
#[derive(Debug, Clone)]
struct FieldEditor {
    focus: Field,
    buffer: TextBuffer,
}

impl Default for FieldEditor {
    fn default() -> Self {
        Self {
            focus: Field::Title,
            buffer: TextBuffer::new(),
        }
    }
}

pub(crate) struct App {
    session: Session,
    outbox: Vec<Request>,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    path_input: TextBuffer,
    editor: FieldEditor,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(route: Route) -> Self {
        let (session, effect) = Session::new(route);
        let mut app = Self {
            session,
            outbox: Vec::new(),
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            path_input: TextBuffer::new(),
            editor: FieldEditor::default(),
            status: None,
            should_quit: false,
        };
        app.outbox.extend(effect);
        app
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn route(&self) -> Route {
        self.session.route()
    }

    /// Requests issued since the last call, oldest first.
    pub(crate) fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    /// Feed a message to the session, queueing any request it issues.
    pub(crate) fn apply(&mut self, message: Message) {
        let before = self.session.route();
        let tasks_before = self.visible_tasks().len();
        let saved = matches!(message, Message::TaskSaved(_, Ok(_)));
        let deleted = matches!(message, Message::TaskDeleted(_, Ok(())));

        let effect = self.session.update(message);
        self.outbox.extend(effect);

        let after = self.session.route();
        if before != after {
            self.on_route_changed();
            if saved {
                self.set_status_info(STATUS_TASK_SAVED);
            } else if deleted {
                self.set_status_info(STATUS_TASK_DELETED);
            }
        } else if deleted && self.visible_tasks().len() < tasks_before {
            self.set_status_info(STATUS_TASK_DELETED);
        }
        self.clamp_selection();
    }

    pub(crate) fn on_tick(&mut self) {
        if self
            .status
            .as_ref()
            .map(|status| status.expired(STATUS_TTL))
            .unwrap_or(false)
        {
            self.status = None;
        }
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, text: T) {
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, text: T) {
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }

    fn on_route_changed(&mut self) {
        self.selected = 0;
        self.table_state = TableState::default();
        self.input_mode = InputMode::Normal;
        self.editor = FieldEditor::default();
        self.status = None;
    }

    fn visible_tasks(&self) -> Vec<&Task> {
        match self.session.screen() {
            Screen::List(list) => list.visible_tasks(),
            _ => Vec::new(),
        }
    }

    fn selected_task_id(&self) -> Option<TaskId> {
        self.visible_tasks()
            .get(self.selected)
            .and_then(|task| task.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.table_state.select(Some(self.selected));
        }
    }

    fn form_session(&self) -> Option<&FormSession> {
        match self.session.screen() {
            Screen::Create(create) => Some(create.session()),
            Screen::Edit(edit) => edit.session().loaded(),
            _ => None,
        }
    }

    /// Re-seed the edit buffer when the form value moved underneath it (load, status cycle).
    fn sync_editor(&mut self) {
        let value = match self.form_session() {
            Some(session) => session.form().value(self.editor.focus).to_string(),
            None => return,
        };
        if self.editor.buffer.as_str() != value {
            self.editor.buffer.set(value);
        }
    }
}
