//! Todo service

use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{fetch, Fields, Outcome};
use crate::api::{ApiClient, ApiClientError, ApiResult, Endpoint};

/// Todo priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Translation key for the priority label
    pub fn label_key(self) -> &'static str {
        match self {
            Priority::Low => "todos.priorities.low",
            Priority::Medium => "todos.priorities.medium",
            Priority::High => "todos.priorities.high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("invalid priority: {} (low, medium, high)", other)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A todo item as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Counts per priority
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityCounts {
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub low: u64,
}

/// Aggregate todo statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub by_priority: PriorityCounts,
    #[serde(default)]
    pub by_category: BTreeMap<String, u64>,
    #[serde(default)]
    pub total_categories: u64,
}

/// New todo, as submitted by the form
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub due_date: String,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}

/// List filters; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl TodoFilter {
    /// Encoded query string, empty when no filter is set
    pub fn query_string(&self) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(completed) = self.completed {
            params.push(("completed", completed.to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            params.push(("category", category.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }

        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// List path with the filter applied
    pub fn path(&self) -> String {
        let query = self.query_string();
        let base = Endpoint::Todos.template();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, query)
        }
    }
}

/// Bulk operation over selected todos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Complete,
    Incomplete,
    Delete,
}

impl FromStr for BulkAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "complete" => Ok(BulkAction::Complete),
            "incomplete" => Ok(BulkAction::Incomplete),
            "delete" => Ok(BulkAction::Delete),
            other => Err(format!(
                "invalid bulk action: {} (complete, incomplete, delete)",
                other
            )),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkRequest<'a> {
    todo_ids: &'a [u64],
    action: BulkAction,
}

#[derive(Debug, Deserialize)]
struct TodoListPayload {
    #[serde(default)]
    todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
struct TodoStatsPayload {
    #[serde(default)]
    statistics: TodoStats,
}

#[derive(Debug, Deserialize)]
struct TodoPayload {
    #[serde(default, alias = "data")]
    todo: Option<Todo>,
}

/// Todo endpoints
pub struct TodosApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TodosApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List todos matching `filter`
    pub async fn list(&self, filter: &TodoFilter) -> ApiResult<Outcome<Vec<Todo>>> {
        let outcome: Outcome<TodoListPayload> =
            fetch::<_, ()>(self.client, Method::GET, &filter.path(), None).await?;
        Ok(outcome.map(|p| p.todos))
    }

    pub async fn stats(&self) -> ApiResult<Outcome<TodoStats>> {
        let path = Endpoint::TodosStats.path()?;
        let outcome: Outcome<TodoStatsPayload> =
            fetch::<_, ()>(self.client, Method::GET, &path, None).await?;
        Ok(outcome.map(|p| p.statistics))
    }

    pub async fn create(&self, input: &TodoInput) -> ApiResult<Outcome<Option<Todo>>> {
        if input.title.trim().is_empty() {
            return Err(ApiClientError::InvalidInput("Title is required".to_string()));
        }
        let path = Endpoint::Todos.path()?;
        let outcome: Outcome<TodoPayload> =
            fetch(self.client, Method::POST, &path, Some(input)).await?;
        tracing::info!("Created todo {:?}", input.title);
        Ok(outcome.map(|p| p.todo))
    }

    pub async fn update(&self, id: u64, update: &TodoUpdate) -> ApiResult<Outcome<Option<Todo>>> {
        let path = Endpoint::Todo.with_id(id)?;
        let outcome: Outcome<TodoPayload> =
            fetch(self.client, Method::PUT, &path, Some(update)).await?;
        Ok(outcome.map(|p| p.todo))
    }

    pub async fn delete(&self, id: u64) -> ApiResult<Outcome<()>> {
        let path = Endpoint::Todo.with_id(id)?;
        let outcome: Outcome<Fields> =
            fetch::<_, ()>(self.client, Method::DELETE, &path, None).await?;
        tracing::info!("Deleted todo {}", id);
        Ok(outcome.map(|_| ()))
    }

    /// Flip a todo's completed flag
    pub async fn toggle(&self, id: u64) -> ApiResult<Outcome<Option<Todo>>> {
        let path = Endpoint::TodosToggle.with_id(id)?;
        let outcome: Outcome<TodoPayload> =
            fetch::<_, ()>(self.client, Method::PATCH, &path, None).await?;
        Ok(outcome.map(|p| p.todo))
    }

    /// Apply `action` to every id; an empty selection is a no-op
    pub async fn bulk(&self, ids: &[u64], action: BulkAction) -> ApiResult<Outcome<usize>> {
        if ids.is_empty() {
            return Ok(Outcome {
                data: 0,
                message: None,
            });
        }

        let path = Endpoint::TodosBulk.path()?;
        let body = BulkRequest {
            todo_ids: ids,
            action,
        };
        let outcome: Outcome<Fields> =
            fetch(self.client, Method::POST, &path, Some(&body)).await?;
        tracing::info!("Bulk {:?} applied to {} todos", action, ids.len());
        Ok(outcome.map(|_| ids.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use crate::test_support::spawn_backend;
    use axum::extract::{Path, RawQuery};
    use axum::routing::{get, patch, post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/todos",
                get(|RawQuery(q): RawQuery| async move {
                    Json(json!({
                        "success": true,
                        "todos": [{
                            "id": 1,
                            "title": "Write report",
                            "completed": false,
                            "priority": "high",
                            "category": "work",
                            "createdBy": "system",
                            "createdAt": "2024-05-01T00:00:00Z",
                            "updatedAt": "2024-05-01T00:00:00Z"
                        }],
                        "query": q
                    }))
                })
                .post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "success": true,
                        "message": "Todo created",
                        "todo": {"id": 9, "title": body["title"], "priority": body["priority"]}
                    }))
                }),
            )
            .route(
                "/api/todos/stats",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "statistics": {
                            "total": 3, "completed": 1, "pending": 2,
                            "byPriority": {"high": 1, "medium": 1, "low": 1},
                            "byCategory": {"work": 2, "home": 1},
                            "totalCategories": 2
                        }
                    }))
                }),
            )
            .route(
                "/api/todos/:id",
                put(|Path(id): Path<u64>, Json(body): Json<Value>| async move {
                    Json(json!({"success": true, "todo": {"id": id, "title": body["title"]}}))
                })
                .delete(|Path(id): Path<u64>| async move {
                    if id == 404 {
                        Json(json!({"success": false, "error": "Todo not found"}))
                    } else {
                        Json(json!({"success": true, "message": "Todo deleted successfully"}))
                    }
                }),
            )
            .route(
                "/api/todos/:id/toggle",
                patch(|Path(id): Path<u64>| async move {
                    Json(json!({"success": true, "todo": {"id": id, "title": "t", "completed": true}}))
                }),
            )
            .route(
                "/api/todos/bulk",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["action"], "delete");
                    Json(json!({"success": true, "affected": body["todoIds"]}))
                }),
            )
    }

    async fn client() -> ApiClient {
        ApiClient::new(ApiConfig::new(spawn_backend(backend()).await)).unwrap()
    }

    #[test]
    fn test_filter_query_string() {
        assert_eq!(TodoFilter::default().query_string(), "");
        assert_eq!(TodoFilter::default().path(), "/api/todos");

        let filter = TodoFilter {
            completed: Some(true),
            priority: Some(Priority::High),
            category: Some("".to_string()),
            search: Some("buy milk".to_string()),
        };
        assert_eq!(
            filter.query_string(),
            "completed=true&priority=high&search=buy%20milk"
        );
        assert_eq!(
            filter.path(),
            "/api/todos?completed=true&priority=high&search=buy%20milk"
        );
    }

    #[test]
    fn test_input_serialization() {
        let input = TodoInput {
            title: "Read".to_string(),
            due_date: "2024-06-01".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["dueDate"], "2024-06-01");

        let update = TodoUpdate {
            title: Some("New".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"title":"New"}"#);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!("delete".parse::<BulkAction>().unwrap(), BulkAction::Delete);
        assert!("archive".parse::<BulkAction>().is_err());
    }

    #[test]
    fn test_priority_labels_resolve() {
        let catalogs = crate::i18n::Catalogs::embedded().unwrap();
        let en = |p: Priority| catalogs.translate(crate::i18n::Locale::En, p.label_key());
        assert_eq!(en(Priority::Low), "Low");
        assert_eq!(en(Priority::Medium), "Medium");
        assert_eq!(en(Priority::High), "High");
    }

    #[tokio::test]
    async fn test_list_and_stats() {
        let client = client().await;

        let todos = client.todos().list(&TodoFilter::default()).await.unwrap();
        assert_eq!(todos.data.len(), 1);
        assert_eq!(todos.data[0].priority, Priority::High);
        assert_eq!(todos.data[0].created_by.as_deref(), Some("system"));

        let stats = client.todos().stats().await.unwrap().data;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_priority.high, 1);
        assert_eq!(stats.by_category.get("work"), Some(&2));
    }

    #[tokio::test]
    async fn test_create_update_toggle() {
        let client = client().await;

        let input = TodoInput {
            title: "Ship release".to_string(),
            priority: Priority::High,
            ..Default::default()
        };
        let created = client.todos().create(&input).await.unwrap();
        assert_eq!(created.message.as_deref(), Some("Todo created"));
        assert_eq!(created.data.unwrap().id, 9);

        let update = TodoUpdate {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = client.todos().update(5, &update).await.unwrap();
        assert_eq!(updated.data.unwrap().title, "Renamed");

        let toggled = client.todos().toggle(5).await.unwrap();
        assert!(toggled.data.unwrap().completed);
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let client = client().await;
        let err = client.todos().create(&TodoInput::default()).await.unwrap_err();
        assert!(matches!(err, ApiClientError::InvalidInput(_)));

        let blank = TodoInput {
            title: "   ".to_string(),
            ..TodoInput::default()
        };
        let err = client.todos().create(&blank).await.unwrap_err();
        assert!(matches!(err, ApiClientError::InvalidInput(ref m) if m == "Title is required"));
    }

    #[tokio::test]
    async fn test_delete_and_backend_failure() {
        let client = client().await;

        let deleted = client.todos().delete(3).await.unwrap();
        assert_eq!(deleted.message.as_deref(), Some("Todo deleted successfully"));

        let err = client.todos().delete(404).await.unwrap_err();
        assert!(matches!(err, ApiClientError::Backend(ref m) if m == "Todo not found"));
    }

    #[tokio::test]
    async fn test_bulk() {
        let client = client().await;
        assert_eq!(
            client.todos().bulk(&[], BulkAction::Delete).await.unwrap().data,
            0
        );
        assert_eq!(
            client
                .todos()
                .bulk(&[1, 2, 3], BulkAction::Delete)
                .await
                .unwrap()
                .data,
            3
        );
    }
}
