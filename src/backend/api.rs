use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequest, Multipart, Path, Request, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};

use super::store::StoreHandle;
use crate::errors::UpdateError;
use crate::models::{Column, Customer, KanbanBoard, Task, UserProfile};
use crate::util::merge_fields_keep_id;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub store: StoreHandle,
    /// Where uploaded profile photos are written.
    pub photos_dir: PathBuf,
}

impl AppState {
    /// State over `store`, keeping photos in `photos/` beside the data file.
    pub fn new(store: StoreHandle) -> Self {
        let photos_dir = store
            .path()
            .parent()
            .map(|dir| dir.join("photos"))
            .unwrap_or_else(|| PathBuf::from("photos"));
        Self { store, photos_dir }
    }
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub task: Task,
    pub column_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub task_id: String,
    pub source_col_id: String,
    pub dest_col_id: String,
    /// Negative values are clamped to the front of the column.
    pub new_index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateColumnRequest {
    pub column: Column,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    NotFound(&'static str),
    BadRequest(&'static str),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({"error": message}))).into_response()
    }
}

/// Log the underlying failure and answer with a generic 500.
fn internal<E: std::fmt::Display>(message: &'static str) -> impl FnOnce(E) -> ApiError {
    move |err| {
        error!(error = %err, "{}", message);
        ApiError::Internal(message)
    }
}

/// `Json` extractor whose rejections answer 400 with the usual `{error}` body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "request body rejected");
                Err(ApiError::BadRequest("Invalid request body"))
            }
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/api/kanban", get(get_kanban))
        .route("/api/kanban/tasks", post(create_task))
        .route("/api/kanban/tasks/{id}", put(update_task).delete(delete_task))
        .route("/api/kanban/move", put(move_task))
        .route("/api/kanban/columns", post(create_column))
        .route("/api/users/{id}", get(get_user).put(update_user))
        .route("/api/users/{id}/photo", post(upload_photo))
        .route("/api/photos/{file}", get(get_photo))
        .route("/api/health", get(health_check))
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "HelixDesk API is running".to_string(),
    })
}

// ── Customers ─────────────────────────────────────────────────────────

async fn list_customers(State(state): State<SharedState>) -> Result<Json<Vec<Customer>>, ApiError> {
    let doc = state
        .store
        .read()
        .await
        .map_err(internal("Failed to fetch customers"))?;
    Ok(Json(doc.customers))
}

async fn get_customer(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let doc = state
        .store
        .read()
        .await
        .map_err(internal("Failed to fetch customer"))?;
    doc.customer(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound("Customer not found"))
}

async fn create_customer(
    State(state): State<SharedState>,
    ApiJson(mut customer): ApiJson<Customer>,
) -> Result<impl IntoResponse, ApiError> {
    if customer.id.is_empty() {
        customer.id = uuid::Uuid::new_v4().to_string();
    }
    let customer = state
        .store
        .modify(move |doc| {
            doc.customers.push(customer.clone());
            (customer, true)
        })
        .await
        .map_err(internal("Failed to create customer"))?;
    debug!(customer_id = %customer.id, "customer created");
    Ok(Json(json!({"success": true, "customer": customer})))
}

async fn update_customer(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(updates): ApiJson<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .store
        .modify(move |doc| {
            let Some(current) = doc.customer_mut(&id) else {
                return (Err(ApiError::NotFound("Customer not found")), false);
            };
            match merge_fields_keep_id(&*current, &updates, &id) {
                Ok(merged) => {
                    *current = merged.clone();
                    (Ok(merged), true)
                }
                Err(_) => (Err(ApiError::BadRequest("Invalid customer update")), false),
            }
        })
        .await
        .map_err(internal("Failed to update customer"))?;
    let customer = outcome?;
    Ok(Json(json!({"success": true, "customer": customer})))
}

async fn delete_customer(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .modify(move |doc| {
            doc.customers.retain(|c| c.id != id);
            ((), true)
        })
        .await
        .map_err(internal("Failed to delete customer"))?;
    Ok(Json(json!({"success": true})))
}

// ── Kanban ────────────────────────────────────────────────────────────

async fn get_kanban(State(state): State<SharedState>) -> Result<Json<KanbanBoard>, ApiError> {
    let doc = state
        .store
        .read()
        .await
        .map_err(internal("Failed to fetch kanban data"))?;
    Ok(Json(doc.kanban))
}

async fn create_task(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let CreateTaskRequest { task, column_id } = req;
    let (task, placed) = state
        .store
        .modify(move |doc| {
            let placed = doc.kanban.add_task(task.clone(), &column_id);
            ((task, placed), true)
        })
        .await
        .map_err(internal("Failed to create task"))?;
    if !placed {
        debug!(task_id = %task.id, "task stored without a column");
    }
    Ok(Json(json!({"success": true, "task": task})))
}

async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(updates): ApiJson<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .store
        .modify(move |doc| match doc.kanban.update_task(&id, &updates) {
            Ok(task) => (Ok(task.clone()), true),
            Err(UpdateError::NotFound(_)) => (Err(ApiError::NotFound("Task not found")), false),
            Err(UpdateError::Invalid(_)) => {
                (Err(ApiError::BadRequest("Invalid task update")), false)
            }
        })
        .await
        .map_err(internal("Failed to update task"))?;
    let task = outcome?;
    Ok(Json(json!({"success": true, "task": task})))
}

async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .modify(move |doc| {
            doc.kanban.delete_task(&id);
            ((), true)
        })
        .await
        .map_err(internal("Failed to delete task"))?;
    Ok(Json(json!({"success": true})))
}

async fn move_task(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<MoveTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_index = usize::try_from(req.new_index).unwrap_or(0);
    let moved = state
        .store
        .modify(move |doc| {
            match doc
                .kanban
                .move_task(&req.task_id, &req.source_col_id, &req.dest_col_id, new_index)
            {
                Ok(()) => (true, true),
                Err(_) => (false, false),
            }
        })
        .await
        .map_err(internal("Failed to move task"))?;
    if !moved {
        return Err(ApiError::NotFound("Column not found"));
    }
    Ok(Json(json!({"success": true})))
}

async fn create_column(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateColumnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let column = req.column;
    let column = state
        .store
        .modify(move |doc| {
            doc.kanban.add_column(column.clone());
            (column, true)
        })
        .await
        .map_err(internal("Failed to create column"))?;
    Ok(Json(json!({"success": true, "column": column})))
}

// ── Users ─────────────────────────────────────────────────────────────

async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let doc = state
        .store
        .read()
        .await
        .map_err(internal("Failed to fetch user"))?;
    doc.users
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound("User not found"))
}

/// Merge into an existing profile, or create one under `id`.
async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(updates): ApiJson<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .store
        .modify(move |doc| {
            let current = doc.users.get(&id).cloned().unwrap_or_else(|| UserProfile {
                id: id.clone(),
                ..Default::default()
            });
            match merge_fields_keep_id(&current, &updates, &id) {
                Ok(user) => {
                    doc.users.insert(id, user.clone());
                    (Ok(user), true)
                }
                Err(_) => (Err(ApiError::BadRequest("Invalid user update")), false),
            }
        })
        .await
        .map_err(internal("Failed to update user"))?;
    let user = outcome?;
    Ok(Json(json!({"success": true, "user": user})))
}

// ── Photos ────────────────────────────────────────────────────────────

/// Extension of an uploaded file name, if it is short and alphanumeric.
fn photo_extension(file_name: &str) -> Option<String> {
    let ext = std::path::Path::new(file_name).extension()?.to_str()?;
    let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

/// Names handed out by `upload_photo`: no separators, no leading dot.
fn is_photo_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

/// Save the multipart `photo` field and point the user's `photo` at it.
/// The user is created if the id is new, as `PUT /api/users/{id}` does.
async fn upload_photo(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let unreadable = |err: axum::extract::multipart::MultipartError| {
        debug!(error = %err, "unreadable photo upload");
        ApiError::BadRequest("Invalid photo upload")
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        if field.name() != Some("photo") {
            continue;
        }
        let extension = field
            .file_name()
            .and_then(photo_extension)
            .unwrap_or_else(|| "bin".to_string());
        let bytes = field.bytes().await.map_err(unreadable)?;
        upload = Some((extension, bytes));
        break;
    }
    let (extension, bytes) = upload.ok_or(ApiError::BadRequest("No photo uploaded"))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("No photo uploaded"));
    }

    let file_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
    tokio::fs::create_dir_all(&state.photos_dir)
        .await
        .map_err(internal("Failed to upload photo"))?;
    tokio::fs::write(state.photos_dir.join(&file_name), &bytes)
        .await
        .map_err(internal("Failed to upload photo"))?;

    let photo_url = format!("/api/photos/{}", file_name);
    let stored_url = photo_url.clone();
    let user = state
        .store
        .modify(move |doc| {
            let user = doc.users.entry(id.clone()).or_insert_with(|| UserProfile {
                id,
                ..Default::default()
            });
            user.photo = Some(stored_url);
            (user.clone(), true)
        })
        .await
        .map_err(internal("Failed to upload photo"))?;
    debug!(user_id = %user.id, size = bytes.len(), "photo uploaded");
    Ok(Json(json!({"success": true, "photoUrl": photo_url, "user": user})))
}

async fn get_photo(
    State(state): State<SharedState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    if !is_photo_file_name(&file) {
        return Err(ApiError::NotFound("Photo not found"));
    }
    let path = state.photos_dir.join(&file);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("Photo not found"));
        }
        Err(err) => {
            error!(error = %err, "Failed to fetch photo");
            return Err(ApiError::Internal("Failed to fetch photo"));
        }
    };
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
}

// ── Tests ─────────────────────────────────────────────────────────────
