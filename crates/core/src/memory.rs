//! In-process [`TaskApi`] used by `--demo` sessions and tests.

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::client::TaskApi;
use crate::error::ApiError;
use crate::model::{Task, TaskId, TaskPayload, TaskStatus};

#[derive(Clone, Copy)]
struct SampleSeed {
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    due_in_days: i64,
}

const SAMPLE_SEEDS: &[SampleSeed] = &[
    SampleSeed {
        title: "Complete Project Documentation",
        description: "Write comprehensive documentation for the new feature implementation",
        status: TaskStatus::InProgress,
        due_in_days: 3,
    },
    SampleSeed {
        title: "Review Code Changes",
        description: "Review pull requests and provide feedback to team members",
        status: TaskStatus::Todo,
        due_in_days: 1,
    },
    SampleSeed {
        title: "Deploy to Production",
        description: "Deploy the latest version to production environment",
        status: TaskStatus::Done,
        due_in_days: -1,
    },
    SampleSeed {
        title: "Update Dependencies",
        description: "Update all project dependencies to their latest stable versions",
        status: TaskStatus::Todo,
        due_in_days: 7,
    },
];

#[derive(Default)]
struct Store {
    tasks: BTreeMap<TaskId, Task>,
    last_id: u64,
    scripted_failures: VecDeque<ApiError>,
    calls: usize,
}

impl Store {
    fn begin_call(&mut self) -> Result<(), ApiError> {
        self.calls += 1;
        match self.scripted_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn allocate_id(&mut self) -> TaskId {
        self.last_id += 1;
        TaskId::new(self.last_id).expect("ids start at one")
    }

    fn insert(&mut self, payload: TaskPayload, now: DateTime<Utc>) -> Task {
        let id = self.allocate_id();
        let task = Task {
            id: Some(id),
            title: payload.title,
            description: payload.description,
            status: payload.status,
            due_date: payload.due_date,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.tasks.insert(id, task.clone());
        task
    }
}

/// Task store living in memory, assigning ids and timestamps the way the remote does.
#[derive(Default)]
pub struct MemoryTaskApi {
    store: Mutex<Store>,
}

impl MemoryTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with the four sample tasks the backend seeds on first start.
    pub fn with_sample_tasks() -> Self {
        let api = Self::new();
        let now = Utc::now();
        for seed in SAMPLE_SEEDS {
            api.seed(TaskPayload {
                title: seed.title.to_string(),
                description: Some(seed.description.to_string()),
                status: seed.status,
                due_date: Some(now + Duration::days(seed.due_in_days)),
            });
        }
        api
    }

    /// Insert a task directly, bypassing validation and scripted failures.
    pub fn seed(&self, payload: TaskPayload) -> Task {
        self.store.lock().insert(payload, Utc::now())
    }

    /// Make the next call fail with `err`. Queued failures are consumed in order.
    pub fn fail_next(&self, err: ApiError) {
        self.store.lock().scripted_failures.push_back(err);
    }

    pub fn len(&self) -> usize {
        self.store.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of operations invoked so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.store.lock().calls
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.store.lock().tasks.values().cloned().collect()
    }
}

fn check_payload(payload: &TaskPayload) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    Ok(())
}

#[async_trait]
impl TaskApi for MemoryTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let mut store = self.store.lock();
        store.begin_call()?;
        Ok(store.tasks.values().cloned().collect())
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let mut store = self.store.lock();
        store.begin_call()?;
        store
            .tasks
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound { id })
    }

    async fn create_task(&self, payload: TaskPayload) -> Result<Task, ApiError> {
        let mut store = self.store.lock();
        store.begin_call()?;
        check_payload(&payload)?;
        Ok(store.insert(payload, Utc::now()))
    }

    async fn update_task(&self, id: TaskId, payload: TaskPayload) -> Result<Task, ApiError> {
        let mut store = self.store.lock();
        store.begin_call()?;
        let existing = store.tasks.get_mut(&id).ok_or(ApiError::NotFound { id })?;
        check_payload(&payload)?;

        existing.title = payload.title;
        existing.description = payload.description;
        existing.status = payload.status;
        existing.due_date = payload.due_date;
        existing.updated_at = Some(Utc::now());
        Ok(existing.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let mut store = self.store.lock();
        store.begin_call()?;
        store
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(ApiError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn payload(title: &str, status: TaskStatus) -> TaskPayload {
        TaskPayload {
            title: title.to_string(),
            description: None,
            status,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps_without_touching_fields() {
        let api = MemoryTaskApi::new();
        let due = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        let submitted = TaskPayload {
            title: "Write release notes".into(),
            description: Some("Cover the new editor".into()),
            status: TaskStatus::InProgress,
            due_date: Some(due),
        };

        let created = api.create_task(submitted.clone()).await.unwrap();

        assert!(created.id.is_some());
        assert!(created.created_at.is_some());
        assert_eq!(TaskPayload::from(&created), submitted);
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let api = MemoryTaskApi::new();
        let err = api
            .create_task(payload("   ", TaskStatus::Todo))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
        assert!(api.is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let api = MemoryTaskApi::new();
        let id = TaskId::new(42).unwrap();

        assert_eq!(api.get_task(id).await.unwrap_err(), ApiError::NotFound { id });
        assert!(api.delete_task(id).await.unwrap_err().is_not_found());
        assert!(api
            .update_task(id, payload("x", TaskStatus::Done))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn update_keeps_creation_time() {
        let api = MemoryTaskApi::new();
        let created = api.seed(payload("Draft", TaskStatus::Todo));
        let id = created.id.unwrap();

        let updated = api
            .update_task(id, payload("Final", TaskStatus::Done))
            .await
            .unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn scripted_failure_is_consumed_once() {
        let api = MemoryTaskApi::with_sample_tasks();
        api.fail_next(ApiError::transport("offline"));

        assert!(api.list_tasks().await.is_err());
        assert_eq!(api.list_tasks().await.unwrap().len(), 4);
        assert_eq!(api.calls(), 2);
    }

    #[test]
    fn sample_tasks_cover_every_status() {
        let api = MemoryTaskApi::with_sample_tasks();
        let tasks = api.snapshot();
        for status in TaskStatus::ALL {
            assert!(tasks.iter().any(|task| task.status == status));
        }
    }
}
