use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::backend::api::{CreateColumnRequest, CreateTaskRequest, HealthStatus, MoveTaskRequest};
use crate::config::ClientSection;
use crate::errors::ClientError;
use crate::models::{Column, Customer, KanbanBoard, Task, UserProfile};

/// Remote operations the client stores depend on.
/// Real implementation: `HttpApi`. Test double: `client::fake::FakeApi`.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ClientError>;

    async fn fetch_kanban(&self) -> Result<KanbanBoard, ClientError>;

    async fn create_task(&self, task: &Task, column_id: &str) -> Result<Task, ClientError>;

    async fn update_task(&self, task_id: &str, updates: &Value) -> Result<Task, ClientError>;

    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError>;

    async fn move_task(&self, request: &MoveTaskRequest) -> Result<(), ClientError>;

    async fn create_column(&self, column: &Column) -> Result<Column, ClientError>;

    async fn fetch_customers(&self) -> Result<Vec<Customer>, ClientError>;

    async fn update_customer(&self, id: &str, updates: &Value) -> Result<Customer, ClientError>;

    async fn update_user(&self, id: &str, updates: &Value) -> Result<UserProfile, ClientError>;

    /// Upload a profile photo; returns the URL the server stored it under.
    async fn upload_photo(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct TaskReply {
    task: Task,
}

#[derive(Deserialize)]
struct ColumnReply {
    column: Column,
}

#[derive(Deserialize)]
struct CustomerReply {
    customer: Customer,
}

#[derive(Deserialize)]
struct UserReply {
    user: UserProfile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoReply {
    photo_url: String,
}

/// `DashboardApi` over HTTP, rooted at a base URL such as
/// `http://localhost:3001/api`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client for the `[client] api_base_url` configured in `helixdesk.toml`.
    pub fn from_config(config: &ClientSection) -> Self {
        Self::new(config.api_base_url.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` extended by `segments`, each percent-encoded so ids
    /// containing `/`, `?` or `#` stay a single path segment.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, ClientError> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send `request`; non-2xx answers become `ClientError::Status` carrying
    /// the server's `{error}` message when it sent one.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
            let message = resp
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or(fallback);
            debug!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.send(self.client.get(self.url(&["health"])?)).await
    }

    async fn fetch_kanban(&self) -> Result<KanbanBoard, ClientError> {
        self.send(self.client.get(self.url(&["kanban"])?)).await
    }

    async fn create_task(&self, task: &Task, column_id: &str) -> Result<Task, ClientError> {
        let body = CreateTaskRequest {
            task: task.clone(),
            column_id: column_id.to_string(),
        };
        let reply: TaskReply = self
            .send(self.client.post(self.url(&["kanban", "tasks"])?).json(&body))
            .await?;
        Ok(reply.task)
    }

    async fn update_task(&self, task_id: &str, updates: &Value) -> Result<Task, ClientError> {
        let url = self.url(&["kanban", "tasks", task_id])?;
        let reply: TaskReply = self.send(self.client.put(url).json(updates)).await?;
        Ok(reply.task)
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError> {
        let url = self.url(&["kanban", "tasks", task_id])?;
        let _: Value = self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn move_task(&self, request: &MoveTaskRequest) -> Result<(), ClientError> {
        let _: Value = self
            .send(self.client.put(self.url(&["kanban", "move"])?).json(request))
            .await?;
        Ok(())
    }

    async fn create_column(&self, column: &Column) -> Result<Column, ClientError> {
        let body = CreateColumnRequest {
            column: column.clone(),
        };
        let reply: ColumnReply = self
            .send(self.client.post(self.url(&["kanban", "columns"])?).json(&body))
            .await?;
        Ok(reply.column)
    }

    async fn fetch_customers(&self) -> Result<Vec<Customer>, ClientError> {
        self.send(self.client.get(self.url(&["customers"])?)).await
    }

    async fn update_customer(&self, id: &str, updates: &Value) -> Result<Customer, ClientError> {
        let url = self.url(&["customers", id])?;
        let reply: CustomerReply = self.send(self.client.put(url).json(updates)).await?;
        Ok(reply.customer)
    }

    async fn update_user(&self, id: &str, updates: &Value) -> Result<UserProfile, ClientError> {
        let url = self.url(&["users", id])?;
        let reply: UserReply = self.send(self.client.put(url).json(updates)).await?;
        Ok(reply.user)
    }

    async fn upload_photo(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let url = self.url(&["users", user_id, "photo"])?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("photo", part);
        let reply: PhotoReply = self.send(self.client.post(url).multipart(form)).await?;
        Ok(reply.photo_url)
    }
}
