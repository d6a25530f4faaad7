//! Boundary to the remote task API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::model::{Task, TaskId, TaskPayload};

const TASKS_SEGMENT: &str = "tasks";

/// The five operations the front-end needs from the remote task store.
///
/// Each call is exactly one round trip. Nothing is retried here; retries are user actions.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError>;

    async fn create_task(&self, payload: TaskPayload) -> Result<Task, ApiError>;

    async fn update_task(&self, id: TaskId, payload: TaskPayload) -> Result<Task, ApiError>;

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError>;
}

/// Which operation produced a response; decides how error statuses are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    List,
    Get(TaskId),
    Create,
    Update(TaskId),
    Delete(TaskId),
}

impl Operation {
    fn target(self) -> Option<TaskId> {
        match self {
            Operation::Get(id) | Operation::Update(id) | Operation::Delete(id) => Some(id),
            Operation::List | Operation::Create => None,
        }
    }

    fn accepts_payload(self) -> bool {
        matches!(self, Operation::Create | Operation::Update(_))
    }
}

/// [`TaskApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpTaskClient {
    http: Client,
    base_url: Url,
}

impl HttpTaskClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: config.base_url().clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Url {
        endpoint(&self.base_url, None)
    }

    fn item_url(&self, id: TaskId) -> Url {
        endpoint(&self.base_url, Some(id))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "task api request");
        self.http.request(method, url)
    }

    async fn send(&self, builder: RequestBuilder, operation: Operation) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = classify(status, &body, operation);
        tracing::warn!(status = status.as_u16(), error = %err, "task api call failed");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: Operation,
    ) -> Result<T, ApiError> {
        let response = self.send(builder, operation).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TaskApi for HttpTaskClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let builder = self.request(Method::GET, self.collection_url());
        self.send_json(builder, Operation::List).await
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let builder = self.request(Method::GET, self.item_url(id));
        self.send_json(builder, Operation::Get(id)).await
    }

    async fn create_task(&self, payload: TaskPayload) -> Result<Task, ApiError> {
        let builder = self
            .request(Method::POST, self.collection_url())
            .json(&payload);
        self.send_json(builder, Operation::Create).await
    }

    async fn update_task(&self, id: TaskId, payload: TaskPayload) -> Result<Task, ApiError> {
        let builder = self.request(Method::PUT, self.item_url(id)).json(&payload);
        self.send_json(builder, Operation::Update(id)).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, self.item_url(id));
        self.send(builder, Operation::Delete(id)).await.map(|_| ())
    }
}

/// `{base}/tasks` or `{base}/tasks/{id}`, regardless of a trailing slash on the base.
pub(crate) fn endpoint(base: &Url, id: Option<TaskId>) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(TASKS_SEGMENT);
        if let Some(id) = id {
            segments.push(&id.to_string());
        }
    }
    url
}

/// Map a non-success HTTP status to the error taxonomy.
pub(crate) fn classify(status: StatusCode, body: &str, operation: Operation) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = operation.target() {
            return ApiError::NotFound { id };
        }
    }

    if operation.accepts_payload()
        && matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
        )
    {
        let message = body_message(body).unwrap_or_else(|| reason(status));
        return ApiError::Validation { message };
    }

    let message = match body_message(body) {
        Some(detail) => format!("{} ({})", reason(status), detail),
        None => reason(status),
    };
    ApiError::Transport { message }
}

fn reason(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn body_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn id(value: u64) -> TaskId {
        TaskId::new(value).unwrap()
    }

    #[rstest]
    #[case("http://localhost:8080/api", None, "http://localhost:8080/api/tasks")]
    #[case("http://localhost:8080/api/", None, "http://localhost:8080/api/tasks")]
    #[case("http://localhost:8080", Some(42), "http://localhost:8080/tasks/42")]
    #[case("https://example.com/v1/", Some(7), "https://example.com/v1/tasks/7")]
    fn builds_endpoints_under_the_base(
        #[case] base: &str,
        #[case] task: Option<u64>,
        #[case] expected: &str,
    ) {
        let base = Url::parse(base).unwrap();
        let url = endpoint(&base, task.and_then(TaskId::new));
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn not_found_maps_to_not_found_for_addressed_calls() {
        let err = classify(StatusCode::NOT_FOUND, "", Operation::Get(id(42)));
        assert_eq!(err, ApiError::NotFound { id: id(42) });

        let err = classify(StatusCode::NOT_FOUND, "", Operation::Delete(id(3)));
        assert!(err.is_not_found());
    }

    #[test]
    fn not_found_on_collection_is_transport() {
        let err = classify(StatusCode::NOT_FOUND, "", Operation::List);
        assert!(matches!(err, ApiError::Transport { .. }));
    }

    #[test]
    fn bad_request_on_create_is_validation_with_body_message() {
        let body = r#"{"status":400,"error":"Bad Request","message":"Title is required"}"#;
        let err = classify(StatusCode::BAD_REQUEST, body, Operation::Create);
        assert_eq!(err, ApiError::validation("Title is required"));
    }

    #[test]
    fn bad_request_without_body_uses_reason() {
        let err = classify(StatusCode::UNPROCESSABLE_ENTITY, "oops", Operation::Update(id(1)));
        assert_eq!(err, ApiError::validation("HTTP 422 Unprocessable Entity"));
    }

    #[test]
    fn server_errors_are_transport() {
        let body = r#"{"error":"Internal Server Error"}"#;
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, body, Operation::Update(id(1)));
        assert_eq!(
            err,
            ApiError::transport("HTTP 500 Internal Server Error (Internal Server Error)")
        );
    }

    #[test]
    fn client_uses_configured_base() {
        let config = ApiConfig::from_url("http://127.0.0.1:9000/api").unwrap();
        let client = HttpTaskClient::new(&config).unwrap();
        assert_eq!(client.collection_url().as_str(), "http://127.0.0.1:9000/api/tasks");
        assert_eq!(
            client.item_url(id(5)).as_str(),
            "http://127.0.0.1:9000/api/tasks/5"
        );
    }
}
