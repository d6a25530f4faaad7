use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Message, Route, Screen};
use crate::core::Field;
use crate::model::TaskStatus;
use crate::tui::constants::STATUS_DELETE_CANCELLED;

use super::{App, InputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListAction {
    Quit,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    Open,
    Create,
    Edit,
    Delete,
    CycleFilter,
    Refresh,
    GoTo,
}

impl ListAction {
    fn from_event(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            KeyCode::Enter => Some(Self::Open),
            KeyCode::Char('c') => Some(Self::Create),
            KeyCode::Char('e') => Some(Self::Edit),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('f') => Some(Self::CycleFilter),
            KeyCode::Char('r') => Some(Self::Refresh),
            KeyCode::Char('g') => Some(Self::GoTo),
            _ => None,
        }
    }
}

/// Next filter in the cycle all → To Do → In Progress → Done → all.
pub(crate) fn next_filter(current: Option<TaskStatus>) -> Option<TaskStatus> {
    match current {
        None => Some(TaskStatus::ALL[0]),
        Some(status) if status == TaskStatus::ALL[TaskStatus::ALL.len() - 1] => None,
        Some(status) => Some(status.next()),
    }
}

fn is_quit_chord(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL)
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        if is_quit_chord(&key) {
            self.should_quit = true;
            return;
        }
        if self.input_mode == InputMode::GoTo {
            self.handle_goto_mode(key);
            return;
        }
        if self.pending_delete() {
            self.handle_confirm_delete(key);
            return;
        }
        match self.session.screen() {
            Screen::List(_) => self.handle_list_key(key),
            Screen::Detail(_) => self.handle_detail_key(key),
            Screen::Create(_) | Screen::Edit(_) => self.handle_form_key(key),
        }
    }

    pub(super) fn pending_delete(&self) -> bool {
        match self.session.screen() {
            Screen::List(list) => list.delete_flow().awaiting_confirmation().is_some(),
            Screen::Detail(detail) => detail.delete_flow().awaiting_confirmation().is_some(),
            _ => false,
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.apply(Message::DeleteConfirmed),
            KeyCode::Char('n') | KeyCode::Esc => {
                self.apply(Message::DeleteCancelled);
                self.set_status_info(STATUS_DELETE_CANCELLED);
            }
            _ => {}
        }
    }

    fn handle_goto_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.path_input.clear();
            }
            KeyCode::Enter => {
                let route = Route::parse(self.path_input.as_str());
                self.input_mode = InputMode::Normal;
                self.path_input.clear();
                self.apply(Message::Navigate(route));
            }
            KeyCode::Backspace => self.path_input.backspace(),
            KeyCode::Delete => self.path_input.delete_char(),
            KeyCode::Left => self.path_input.move_left(),
            KeyCode::Right => self.path_input.move_right(),
            KeyCode::Home => self.path_input.move_home(),
            KeyCode::End => self.path_input.move_end(),
            KeyCode::Char(ch) => self.path_input.insert_char(ch),
            _ => {}
        }
    }

    fn enter_goto(&mut self) {
        self.input_mode = InputMode::GoTo;
        self.path_input.set(self.route().path());
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let Some(action) = ListAction::from_event(&key) else {
            if key.code == KeyCode::Esc {
                self.apply(Message::DismissNotice);
            }
            return;
        };
        let len = self.visible_tasks().len();
        match action {
            ListAction::Quit => self.should_quit = true,
            ListAction::SelectNext => {
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
            }
            ListAction::SelectPrev => self.selected = self.selected.saturating_sub(1),
            ListAction::SelectFirst => self.selected = 0,
            ListAction::SelectLast => self.selected = len.saturating_sub(1),
            ListAction::Open => {
                if let Some(id) = self.selected_task_id() {
                    self.apply(Message::Navigate(Route::Detail(id)));
                }
            }
            ListAction::Create => self.apply(Message::Navigate(Route::Create)),
            ListAction::Edit => {
                if let Some(id) = self.selected_task_id() {
                    self.apply(Message::Navigate(Route::Edit(id)));
                }
            }
            ListAction::Delete => match self.selected_task_id() {
                Some(id) => self.apply(Message::DeleteRequested(id)),
                None => self.set_status_error("No task selected"),
            },
            ListAction::CycleFilter => {
                let current = match self.session.screen() {
                    Screen::List(list) => list.filter(),
                    _ => None,
                };
                self.selected = 0;
                self.apply(Message::FilterChanged(next_filter(current)));
            }
            ListAction::Refresh => self.apply(Message::Retry),
            ListAction::GoTo => self.enter_goto(),
        }
        self.clamp_selection();
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        let Screen::Detail(detail) = self.session.screen() else {
            return;
        };
        let id = detail.id();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('e') => self.apply(Message::Navigate(Route::Edit(id))),
            KeyCode::Char('x') | KeyCode::Delete => self.apply(Message::DeleteRequested(id)),
            KeyCode::Char('r') => self.apply(Message::Retry),
            KeyCode::Char('g') => self.enter_goto(),
            KeyCode::Esc | KeyCode::Backspace => {
                let parent = self.route().parent();
                self.apply(Message::Navigate(parent));
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            let parent = self.route().parent();
            self.apply(Message::Navigate(parent));
            return;
        }

        if self.form_session().is_none() {
            // Edit screen still loading or failed to load.
            if key.code == KeyCode::Char('r') {
                self.apply(Message::Retry);
            }
            return;
        }

        self.sync_editor();
        let focus = self.editor.focus;
        match key.code {
            KeyCode::Tab => self.move_focus(focus.next()),
            KeyCode::BackTab => self.move_focus(focus.prev()),
            KeyCode::Enter => {
                self.apply(Message::FieldTouched(focus));
                self.apply(Message::Submit);
            }
            KeyCode::Left | KeyCode::Right if focus == Field::Status => {
                let current = self.editor.buffer.as_str().parse::<TaskStatus>().ok();
                let next = match (current, key.code) {
                    (Some(status), KeyCode::Right) => status.next(),
                    (Some(status), _) => status.prev(),
                    (None, KeyCode::Right) => TaskStatus::ALL[0],
                    (None, _) => TaskStatus::ALL[TaskStatus::ALL.len() - 1],
                };
                self.apply(Message::FieldChanged(Field::Status, next.as_str().to_string()));
                self.sync_editor();
            }
            _ if focus == Field::Status => {}
            KeyCode::Left => self.editor.buffer.move_left(),
            KeyCode::Right => self.editor.buffer.move_right(),
            KeyCode::Home => self.editor.buffer.move_home(),
            KeyCode::End => self.editor.buffer.move_end(),
            KeyCode::Backspace => {
                self.editor.buffer.backspace();
                self.commit_editor();
            }
            KeyCode::Delete => {
                self.editor.buffer.delete_char();
                self.commit_editor();
            }
            KeyCode::Char(ch) => {
                self.editor.buffer.insert_char(ch);
                self.commit_editor();
            }
            _ => {}
        }
    }

    /// Leaving a field marks it touched so its error becomes visible.
    fn move_focus(&mut self, next: Field) {
        let left = self.editor.focus;
        self.apply(Message::FieldTouched(left));
        self.editor.focus = next;
        self.editor.buffer.clear();
        self.sync_editor();
    }

    fn commit_editor(&mut self) {
        let value = self.editor.buffer.as_str().to_string();
        self.apply(Message::FieldChanged(self.editor.focus, value));
    }
}
