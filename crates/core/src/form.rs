//! Form input, validation and date field mapping for the create and edit screens.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::model::{Task, TaskPayload, TaskStatus};

/// Editable text form of a due date, precise to the minute.
pub const EDITABLE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const EDITABLE_INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
    Status,
    DueDate,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Description, Field::Status, Field::DueDate];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Status => "Status",
            Field::DueDate => "Due date",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Field::Title | Field::Status)
    }

    pub fn next(self) -> Self {
        match self {
            Field::Title => Field::Description,
            Field::Description => Field::Status,
            Field::Status => Field::DueDate,
            Field::DueDate => Field::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Title => Field::DueDate,
            Field::Description => Field::Title,
            Field::Status => Field::Description,
            Field::DueDate => Field::Status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),
    #[error("Invalid date '{0}': use YYYY-MM-DDTHH:MM")]
    InvalidDate(String),
}

/// Field-level reasons a form cannot be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(field, err)| (*field, err))
    }

    fn insert(&mut self, field: Field, err: FieldError) {
        self.0.insert(field, err);
    }
}

/// Raw, unvalidated form values exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFormInput {
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: String,
}

impl TaskFormInput {
    pub fn from_task(task: &Task) -> Self {
        Self::from_task_in(task, &Local)
    }

    pub fn from_task_in<Tz: TimeZone>(task: &Task, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.as_str().to_string(),
            due_date: task
                .due_date
                .map(|due| to_editable_in(due, tz))
                .unwrap_or_default(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Status => &self.status,
            Field::DueDate => &self.due_date,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Status => self.status = value,
            Field::DueDate => self.due_date = value,
        }
    }
}

/// Validate `input` against the local time zone.
pub fn validate(input: &TaskFormInput) -> Result<TaskPayload, FieldErrors> {
    validate_in(input, &Local)
}

/// Validate `input`, reading the due date as wall-clock time in `tz`.
pub fn validate_in<Tz: TimeZone>(input: &TaskFormInput, tz: &Tz) -> Result<TaskPayload, FieldErrors> {
    let mut errors = FieldErrors::default();

    if input.title.trim().is_empty() {
        errors.insert(Field::Title, FieldError::Required);
    }

    let status = match parse_status(&input.status) {
        Ok(status) => Some(status),
        Err(err) => {
            errors.insert(Field::Status, err);
            None
        }
    };

    let due_date = if input.due_date.trim().is_empty() {
        None
    } else {
        match from_editable_in(&input.due_date, tz) {
            Ok(instant) => Some(instant),
            Err(err) => {
                errors.insert(Field::DueDate, err);
                None
            }
        }
    };

    match status {
        Some(status) if errors.is_empty() => Ok(TaskPayload {
            title: input.title.clone(),
            description: non_blank(&input.description),
            status,
            due_date,
        }),
        _ => Err(errors),
    }
}

fn parse_status(raw: &str) -> Result<TaskStatus, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::Required);
    }
    raw.parse::<TaskStatus>()
        .map_err(|_| FieldError::UnknownStatus(raw.trim().to_string()))
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Render an instant as editable local text. Seconds are dropped.
pub fn to_editable(instant: DateTime<Utc>) -> String {
    to_editable_in(instant, &Local)
}

pub fn to_editable_in<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant
        .with_timezone(tz)
        .format(EDITABLE_DATE_FORMAT)
        .to_string()
}

/// Read editable local text back into an instant.
pub fn from_editable(text: &str) -> Result<DateTime<Utc>, FieldError> {
    from_editable_in(text, &Local)
}

pub fn from_editable_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<DateTime<Utc>, FieldError> {
    let trimmed = text.trim();
    let naive = EDITABLE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| FieldError::InvalidDate(trimmed.to_string()))?;

    let local = match tz.from_local_datetime(&naive) {
        LocalResult::Single(value) => value,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => return Err(FieldError::InvalidDate(trimmed.to_string())),
    };
    Ok(local.with_timezone(&Utc))
}

/// Form state: raw values, which fields the user has interacted with, and current errors.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    input: TaskFormInput,
    touched: BTreeSet<Field>,
    errors: FieldErrors,
    // Due date as loaded, with the text it was rendered to. Wall-clock text is
    // lossy (seconds, repeated hours), so untouched text maps back to this instant.
    loaded_due: Option<(String, DateTime<Utc>)>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::from_input(TaskFormInput::default())
    }

    pub fn from_task(task: &Task) -> Self {
        Self::from_task_in(task, &Local)
    }

    pub fn from_task_in<Tz: TimeZone>(task: &Task, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let input = TaskFormInput::from_task_in(task, tz);
        let loaded_due = task.due_date.map(|due| (input.due_date.clone(), due));
        Self {
            loaded_due,
            ..Self::from_input(input)
        }
    }

    pub fn from_input(input: TaskFormInput) -> Self {
        let mut form = Self {
            input,
            touched: BTreeSet::new(),
            errors: FieldErrors::default(),
            loaded_due: None,
        };
        form.revalidate();
        form
    }

    pub fn input(&self) -> &TaskFormInput {
        &self.input
    }

    pub fn value(&self, field: Field) -> &str {
        self.input.get(field)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.input.set(field, value.into());
        self.revalidate();
    }

    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    pub fn touch_all(&mut self) {
        self.touched.extend(Field::ALL);
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The error to show for `field`; hidden until the field has been touched.
    pub fn visible_error(&self, field: Field) -> Option<&FieldError> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn payload(&self) -> Result<TaskPayload, FieldErrors> {
        let mut payload = validate(&self.input)?;
        if let Some((text, due)) = &self.loaded_due {
            if self.input.due_date == *text {
                payload.due_date = Some(*due);
            }
        }
        Ok(payload)
    }

    fn revalidate(&mut self) {
        self.errors = match validate(&self.input) {
            Ok(_) => FieldErrors::default(),
            Err(errors) => errors,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn input(title: &str, status: &str) -> TaskFormInput {
        TaskFormInput {
            title: title.into(),
            status: status.into(),
            ..TaskFormInput::default()
        }
    }

    fn zone(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_titles_are_required(#[case] title: &str) {
        let errors = validate(&input(title, "TODO")).unwrap_err();
        assert_eq!(errors.get(Field::Title), Some(&FieldError::Required));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn status_must_be_present_and_known() {
        let errors = validate(&input("Plan", "")).unwrap_err();
        assert_eq!(errors.get(Field::Status), Some(&FieldError::Required));

        let errors = validate(&input("Plan", "BLOCKED")).unwrap_err();
        assert_eq!(
            errors.get(Field::Status),
            Some(&FieldError::UnknownStatus("BLOCKED".into()))
        );
    }

    #[test]
    fn blank_optionals_become_none() {
        let mut raw = input("Plan sprint", "IN_PROGRESS");
        raw.description = "   ".into();
        raw.due_date = " ".into();

        let payload = validate(&raw).unwrap();
        assert_eq!(
            payload,
            TaskPayload {
                title: "Plan sprint".into(),
                description: None,
                status: TaskStatus::InProgress,
                due_date: None,
            }
        );
    }

    #[test]
    fn reports_every_invalid_field_at_once() {
        let raw = TaskFormInput {
            title: String::new(),
            description: String::new(),
            status: String::new(),
            due_date: "next tuesday".into(),
        };
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get(Field::DueDate),
            Some(&FieldError::InvalidDate("next tuesday".into()))
        );
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(-7)]
    #[case(9)]
    fn editable_text_round_trips_to_the_minute(#[case] offset_hours: i32) {
        let tz = zone(offset_hours);
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();

        let text = to_editable_in(instant, &tz);
        let back = from_editable_in(&text, &tz).unwrap();

        assert_eq!(back, instant);
    }

    #[test]
    fn editable_text_drops_seconds() {
        let tz = zone(1);
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 45).unwrap();

        let text = to_editable_in(instant, &tz);
        assert_eq!(text, "2024-03-01T11:30");

        let back = from_editable_in(&text, &tz).unwrap();
        assert_eq!(back.second(), 0);
        assert_eq!(back, instant.with_second(0).unwrap());
    }

    #[test]
    fn due_date_is_read_in_the_given_zone() {
        let mut raw = input("Call", "TODO");
        raw.due_date = "2024-03-01T12:30".into();

        let payload = validate_in(&raw, &zone(2)).unwrap();
        assert_eq!(
            payload.due_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn errors_are_hidden_until_touched() {
        let mut form = TaskForm::new();
        assert!(!form.is_valid());
        assert_eq!(form.visible_error(Field::Title), None);

        form.touch(Field::Title);
        assert_eq!(form.visible_error(Field::Title), Some(&FieldError::Required));

        form.set(Field::Title, "Write tests");
        assert_eq!(form.visible_error(Field::Title), None);
        assert_eq!(form.visible_error(Field::Status), None);

        form.touch_all();
        assert_eq!(form.visible_error(Field::Status), Some(&FieldError::Required));
    }

    #[test]
    fn form_prefills_from_task() {
        let due = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        let task = Task {
            id: crate::model::TaskId::new(3),
            title: "Review".into(),
            description: None,
            status: TaskStatus::Done,
            due_date: Some(due),
            created_at: None,
            updated_at: None,
        };

        let form = TaskForm::from_task(&task);
        assert!(form.is_valid());
        assert_eq!(form.value(Field::Status), "DONE");
        assert_eq!(form.value(Field::Description), "");
        assert_eq!(form.payload().unwrap(), TaskPayload::from(&task));
    }

    /// US Eastern around the 2024-11-03 fall-back: 01:00-02:00 local happens twice.
    #[derive(Debug, Clone, Copy)]
    struct FallBackZone;

    impl FallBackZone {
        fn switch() -> NaiveDateTime {
            Utc.with_ymd_and_hms(2024, 11, 3, 6, 0, 0).unwrap().naive_utc()
        }
    }

    impl TimeZone for FallBackZone {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            FallBackZone
        }

        fn offset_from_local_date(&self, local: &chrono::NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let summer = *local + chrono::Duration::hours(4) < Self::switch();
            let winter = *local + chrono::Duration::hours(5) >= Self::switch();
            match (summer, winter) {
                (true, true) => LocalResult::Ambiguous(zone(-4), zone(-5)),
                (true, false) => LocalResult::Single(zone(-4)),
                (false, true) => LocalResult::Single(zone(-5)),
                (false, false) => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &chrono::NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch() {
                zone(-4)
            } else {
                zone(-5)
            }
        }
    }

    fn task_due(due: DateTime<Utc>) -> Task {
        Task {
            id: crate::model::TaskId::new(8),
            title: "Night shift".into(),
            description: None,
            status: TaskStatus::Todo,
            due_date: Some(due),
            created_at: None,
            updated_at: None,
        }
    }

    #[rstest]
    #[case(Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap())]
    #[case(Utc.with_ymd_and_hms(2024, 11, 3, 6, 30, 0).unwrap())]
    fn unchanged_due_date_survives_a_repeated_hour(#[case] due: DateTime<Utc>) {
        let form = TaskForm::from_task_in(&task_due(due), &FallBackZone);
        assert_eq!(form.value(Field::DueDate), "2024-11-03T01:30");

        assert_eq!(form.payload().unwrap().due_date, Some(due));
    }

    #[test]
    fn repeated_hour_text_reads_as_the_earlier_instant() {
        let back = from_editable_in("2024-11-03T01:30", &FallBackZone).unwrap();
        assert_eq!(back, Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap());
    }

    #[test]
    fn unchanged_due_date_keeps_its_seconds() {
        let due = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 45).unwrap();
        let mut form = TaskForm::from_task(&task_due(due));
        assert_eq!(form.payload().unwrap().due_date, Some(due));

        let edited = to_editable(due + chrono::Duration::hours(1));
        form.set(Field::DueDate, edited);
        assert_eq!(
            form.payload().unwrap().due_date,
            Some(due.with_second(0).unwrap() + chrono::Duration::hours(1))
        );
    }

    #[test]
    fn field_focus_cycles() {
        let mut field = Field::Title;
        for _ in 0..Field::ALL.len() {
            field = field.next();
        }
        assert_eq!(field, Field::Title);
        assert_eq!(Field::Title.prev(), Field::DueDate);
    }
}
