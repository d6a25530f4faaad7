use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const INPUT_SLICE: Duration = Duration::from_millis(30);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(4);

pub(crate) const HINT_LIST: &str =
    "j/k move • Enter open • c create • e edit • x delete • f filter • r refresh • g go to • q quit";
pub(crate) const HINT_DETAIL: &str = "e edit • x delete • r retry • g go to • Esc back • q quit";
pub(crate) const HINT_FORM: &str =
    "Tab/Shift+Tab next/prev field • ←/→ change status • Enter save • Esc cancel";
pub(crate) const HINT_CONFIRM_DELETE: &str = "Delete this task? y confirm • n cancel";
pub(crate) const HINT_GOTO: &str = "Go to path (e.g. /tasks/3/edit) • Enter go • Esc cancel";

pub(crate) const STATUS_LOADING: &str = "Loading...";
pub(crate) const STATUS_SAVING: &str = "Saving...";
pub(crate) const STATUS_TASK_SAVED: &str = "Task saved";
pub(crate) const STATUS_TASK_DELETED: &str = "Task deleted";
pub(crate) const STATUS_DELETE_CANCELLED: &str = "Deletion cancelled";
pub(crate) const STATUS_RETRY: &str = "press r to retry";
