use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::layout::Rect;

use super::input::next_filter;
use super::App;
use crate::app::{ApiCall, Message, Request, Route, Screen};
use crate::core::Field;
use crate::model::{Task, TaskId, TaskPayload, TaskStatus};
use crate::tui::helpers::centered_rect;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.on_key(key(KeyCode::Char(ch)));
    }
}

fn task(id: u64, title: &str, status: TaskStatus) -> Task {
    let now = Utc::now();
    Task {
        id: TaskId::new(id),
        title: title.to_string(),
        description: None,
        status,
        due_date: None,
        created_at: Some(now),
        updated_at: Some(now),
    }
}

fn only_request(app: &mut App) -> Request {
    let mut requests = app.take_requests();
    assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
    requests.remove(0)
}

fn loaded_list() -> App {
    let mut app = App::new(Route::List);
    let request = only_request(&mut app);
    app.apply(Message::TasksLoaded(
        request.id,
        Ok(vec![
            task(1, "Write docs", TaskStatus::Todo),
            task(2, "Review", TaskStatus::InProgress),
            task(3, "Ship", TaskStatus::Done),
        ]),
    ));
    app
}

#[test]
fn centered_rect_keeps_within_bounds() {
    let area = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };
    let rect = centered_rect(40, 10, area);
    assert!(rect.x >= area.x);
    assert!(rect.y >= area.y);
    assert_eq!(rect.width, 40);
    assert_eq!(rect.height, 10);

    let clipped = centered_rect(120, 40, area);
    assert_eq!((clipped.width, clipped.height), (80, 24));
}

#[test]
fn filter_cycles_through_every_status_and_back() {
    let mut filter = None;
    let mut seen = Vec::new();
    for _ in 0..4 {
        filter = next_filter(filter);
        seen.push(filter);
    }
    assert_eq!(
        seen,
        vec![
            Some(TaskStatus::Todo),
            Some(TaskStatus::InProgress),
            Some(TaskStatus::Done),
            None
        ]
    );
}

#[test]
fn list_opens_the_selected_task() {
    let mut app = loaded_list();
    app.on_key(key(KeyCode::Char('j')));
    app.on_key(key(KeyCode::Enter));

    assert_eq!(app.route(), Route::Detail(TaskId::new(2).unwrap()));
    let request = only_request(&mut app);
    assert_eq!(request.call, ApiCall::GetTask(TaskId::new(2).unwrap()));
}

#[test]
fn selection_stays_within_the_filtered_rows() {
    let mut app = loaded_list();
    for _ in 0..5 {
        app.on_key(key(KeyCode::Char('j')));
    }
    assert_eq!(app.selected, 2);

    app.on_key(key(KeyCode::Char('f')));
    assert_eq!(app.selected, 0);
    app.on_key(key(KeyCode::Char('j')));
    assert_eq!(app.selected, 0);
}

#[test]
fn delete_waits_for_confirmation() {
    let mut app = loaded_list();

    app.on_key(key(KeyCode::Char('x')));
    app.on_key(key(KeyCode::Char('n')));
    assert!(app.take_requests().is_empty());

    app.on_key(key(KeyCode::Char('x')));
    app.on_key(key(KeyCode::Char('y')));
    let request = only_request(&mut app);
    assert_eq!(request.call, ApiCall::DeleteTask(TaskId::new(1).unwrap()));

    app.apply(Message::TaskDeleted(request.id, Ok(())));
    assert_eq!(app.visible_tasks().len(), 2);
    assert_eq!(
        app.status.as_ref().map(|status| status.text.as_str()),
        Some("Task deleted")
    );
}

#[test]
fn create_form_builds_the_payload_from_keystrokes() {
    let mut app = App::new(Route::Create);
    assert!(app.take_requests().is_empty());

    type_text(&mut app, "Plan");
    app.on_key(key(KeyCode::Tab));
    type_text(&mut app, "Next sprint");
    app.on_key(key(KeyCode::Tab));
    app.on_key(key(KeyCode::Right));
    app.on_key(key(KeyCode::Right));
    app.on_key(key(KeyCode::Enter));

    let request = only_request(&mut app);
    assert_eq!(
        request.call,
        ApiCall::CreateTask(TaskPayload {
            title: "Plan".into(),
            description: Some("Next sprint".into()),
            status: TaskStatus::InProgress,
            due_date: None,
        })
    );
}

#[test]
fn invalid_create_reveals_errors_instead_of_submitting() {
    let mut app = App::new(Route::Create);
    app.on_key(key(KeyCode::Enter));

    assert!(app.take_requests().is_empty());
    let Screen::Create(create) = app.session.screen() else {
        panic!("expected create screen");
    };
    assert!(create.session().form().visible_error(Field::Title).is_some());
    assert!(create.session().form().visible_error(Field::Status).is_some());
}

#[test]
fn leaving_a_field_touches_it() {
    let mut app = App::new(Route::Create);
    app.on_key(key(KeyCode::Tab));

    let Screen::Create(create) = app.session.screen() else {
        panic!("expected create screen");
    };
    assert!(create.session().form().is_touched(Field::Title));
    assert!(!create.session().form().is_touched(Field::Description));
}

#[test]
fn escape_from_edit_returns_to_detail() {
    let id = TaskId::new(5).unwrap();
    let mut app = App::new(Route::Edit(id));
    let load = only_request(&mut app);
    app.apply(Message::TaskLoaded(load.id, Ok(task(5, "Edit me", TaskStatus::Todo))));

    app.on_key(key(KeyCode::Esc));

    assert_eq!(app.route(), Route::Detail(id));
    assert_eq!(only_request(&mut app).call, ApiCall::GetTask(id));
}

#[test]
fn goto_prompt_navigates_and_redirects_unknown_paths() {
    let mut app = loaded_list();
    app.on_key(key(KeyCode::Char('g')));
    for _ in 0.."/tasks".len() {
        app.on_key(key(KeyCode::Backspace));
    }
    type_text(&mut app, "/tasks/create");
    app.on_key(key(KeyCode::Enter));
    assert_eq!(app.route(), Route::Create);

    app.on_key(key(KeyCode::Esc));
    assert_eq!(app.route(), Route::List);
    app.take_requests();

    app.on_key(key(KeyCode::Char('g')));
    type_text(&mut app, "/nowhere");
    app.on_key(key(KeyCode::Enter));
    assert_eq!(app.route(), Route::List);
}

#[test]
fn ctrl_c_quits_from_a_form() {
    let mut app = App::new(Route::Create);
    app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());
}
