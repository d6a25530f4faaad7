//! Screen addressing: four routes, everything else lands on the task list.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use taskdesk_core::TaskId;

static ROUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/?tasks(?:/(?:(?P<create>create)|(?P<id>\d+)(?P<edit>/edit)?))?/?$")
        .expect("route pattern compiles")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    List,
    Create,
    Detail(TaskId),
    Edit(TaskId),
}

impl Route {
    /// Resolve a path. Unknown paths, and ids that are not positive integers, redirect to the list.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let Some(captures) = ROUTE_PATTERN.captures(trimmed) else {
            if !trimmed.is_empty() && trimmed != "/" {
                tracing::debug!(path = trimmed, "unknown route, redirecting to task list");
            }
            return Route::List;
        };

        if captures.name("create").is_some() {
            return Route::Create;
        }

        let id = captures
            .name("id")
            .and_then(|raw| raw.as_str().parse::<TaskId>().ok());
        match (id, captures.name("edit").is_some()) {
            (Some(id), true) => Route::Edit(id),
            (Some(id), false) => Route::Detail(id),
            (None, _) => Route::List,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/tasks".to_string(),
            Route::Create => "/tasks/create".to_string(),
            Route::Detail(id) => format!("/tasks/{}", id),
            Route::Edit(id) => format!("/tasks/{}/edit", id),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::List => "All Tasks",
            Route::Create => "Create Task",
            Route::Detail(_) => "Task Details",
            Route::Edit(_) => "Edit Task",
        }
    }

    /// Where "cancel"/"back" leads from this screen.
    pub fn parent(&self) -> Route {
        match self {
            Route::List | Route::Create | Route::Detail(_) => Route::List,
            Route::Edit(id) => Route::Detail(*id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(value: u64) -> TaskId {
        TaskId::new(value).unwrap()
    }

    #[rstest]
    #[case("/tasks", Route::List)]
    #[case("tasks/", Route::List)]
    #[case("/tasks/create", Route::Create)]
    #[case("/tasks/42", Route::Detail(id(42)))]
    #[case("/tasks/42/edit", Route::Edit(id(42)))]
    #[case("/tasks/42/edit/", Route::Edit(id(42)))]
    fn parses_known_paths(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("/projects")]
    #[case("/tasks/0")]
    #[case("/tasks/abc")]
    #[case("/tasks/-1/edit")]
    #[case("/tasks/42/delete")]
    #[case("/tasks/create/edit")]
    fn unknown_paths_redirect_to_list(#[case] path: &str) {
        assert_eq!(Route::parse(path), Route::List);
    }

    #[test]
    fn paths_round_trip() {
        for route in [Route::List, Route::Create, Route::Detail(id(7)), Route::Edit(id(7))] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn edit_returns_to_detail() {
        assert_eq!(Route::Edit(id(3)).parent(), Route::Detail(id(3)));
        assert_eq!(Route::Detail(id(3)).parent(), Route::List);
        assert_eq!(Route::Create.parent(), Route::List);
    }
}
