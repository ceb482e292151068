//! RestTaskRepository - task backend over a PostgREST-style `/rest/v1` API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core::error::{GuardianError, Result};
use guardian_core::task::{Task, TaskRepository, TaskStatus, Tier};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::http::{ensure_success, map_http_error, request_error};

const SERVICE: &str = "backend";

/// [`TaskRepository`] backed by the `tasks` table of a REST backend.
pub struct RestTaskRepository {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestTaskRepository {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            access_token: None,
        }
    }

    /// Sends the user's session token instead of the anonymous key.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn tasks_url(&self) -> String {
        format!("{}/rest/v1/tasks", self.base_url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        builder.header("apikey", &self.api_key).bearer_auth(bearer)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|err| request_error(SERVICE, err))?;

        let response = match ensure_success(SERVICE, response).await {
            Ok(response) => response,
            Err((status, body)) => return Err(map_http_error(SERVICE, status, &body)),
        };

        response.json().await.map_err(|err| {
            GuardianError::upstream(SERVICE, format!("Failed to parse tasks: {err}"))
        })
    }
}

#[async_trait]
impl TaskRepository for RestTaskRepository {
    async fn find_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        let rows: Vec<TaskRow> = self
            .fetch(
                self.client
                    .get(self.tasks_url())
                    .query(&[("select", "*".to_string()), ("id", format!("eq.{task_id}"))]),
            )
            .await?;
        Ok(rows.into_iter().next().map(Task::from))
    }

    async fn save(&self, task: &Task) -> Result<()> {
        let _: Vec<TaskRow> = self
            .fetch(
                self.client
                    .post(self.tasks_url())
                    .header("Prefer", "resolution=merge-duplicates,return=representation")
                    .json(&[TaskRow::from(task)]),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, task_id: &str) -> Result<()> {
        let deleted: Vec<TaskRow> = self
            .fetch(
                self.client
                    .delete(self.tasks_url())
                    .header("Prefer", "return=representation")
                    .query(&[("id", format!("eq.{task_id}"))]),
            )
            .await?;
        if deleted.is_empty() {
            return Err(GuardianError::not_found("task", task_id));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = self
            .fetch(
                self.client
                    .get(self.tasks_url())
                    .query(&[("select", "*"), ("order", "created_at.desc")]),
            )
            .await?;
        tracing::debug!(count = rows.len(), "Fetched tasks from backend");
        Ok(rows.into_iter().map(Task::from).collect())
    }
}

/// Row shape of the `tasks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TaskRow {
    id: String,
    client_id: String,
    tier: Tier,
    input: String,
    ai_draft: String,
    confidence: u8,
    status: TaskStatus,
    risk_flag: bool,
    created_at: DateTime<Utc>,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            client_id: task.client_id.clone(),
            tier: task.tier,
            input: task.input.clone(),
            ai_draft: task.ai_draft.clone(),
            confidence: task.confidence,
            status: task.status,
            risk_flag: task.risk_flag,
            created_at: task.timestamp,
        }
    }
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            client_id: row.client_id,
            tier: row.tier,
            input: row.input,
            ai_draft: row.ai_draft,
            confidence: row.confidence,
            status: row.status,
            risk_flag: row.risk_flag,
            timestamp: row.created_at,
        }
    }
}
