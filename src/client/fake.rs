//! In-memory `DashboardApi` for store tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::api::DashboardApi;
use crate::backend::api::{HealthStatus, MoveTaskRequest};
use crate::errors::ClientError;
use crate::models::{Column, Customer, KanbanBoard, Task, UserProfile};
use crate::util::merge_fields_keep_id;

/// Holds the "server" copy of the data. Writes can be made to fail to
/// exercise the resync paths, reads can be made to fail on top of that.
#[derive(Default)]
pub struct FakeApi {
    pub board: Mutex<KanbanBoard>,
    pub customers: Mutex<Vec<Customer>>,
    pub users: Mutex<BTreeMap<String, UserProfile>>,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    pub writes: AtomicUsize,
}

impl FakeApi {
    pub fn with_board(board: KanbanBoard) -> Self {
        let api = Self::default();
        *api.board.lock().unwrap() = board;
        api
    }

    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let api = Self::default();
        *api.customers.lock().unwrap() = customers;
        api
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_reads(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    pub fn server_board(&self) -> KanbanBoard {
        self.board.lock().unwrap().clone()
    }

    fn write(&self, message: &str) -> Result<(), ClientError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                message: message.to_string(),
            });
        }
        Ok(())
    }

    fn read(&self, message: &str) -> Result<(), ClientError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                message: message.to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(message: &str) -> ClientError {
    ClientError::Status {
        status: 404,
        message: message.to_string(),
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn health(&self) -> Result<HealthStatus, ClientError> {
        Ok(HealthStatus {
            status: "OK".into(),
            message: "HelixDesk API is running".into(),
        })
    }

    async fn fetch_kanban(&self) -> Result<KanbanBoard, ClientError> {
        self.read("Failed to fetch kanban data")?;
        Ok(self.server_board())
    }

    async fn create_task(&self, task: &Task, column_id: &str) -> Result<Task, ClientError> {
        self.write("Failed to create task")?;
        self.board.lock().unwrap().add_task(task.clone(), column_id);
        Ok(task.clone())
    }

    async fn update_task(&self, task_id: &str, updates: &Value) -> Result<Task, ClientError> {
        self.write("Failed to update task")?;
        let mut board = self.board.lock().unwrap();
        board
            .update_task(task_id, updates)
            .cloned()
            .map_err(|_| not_found("Task not found"))
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError> {
        self.write("Failed to delete task")?;
        self.board.lock().unwrap().delete_task(task_id);
        Ok(())
    }

    async fn move_task(&self, request: &MoveTaskRequest) -> Result<(), ClientError> {
        self.write("Failed to move task")?;
        let index = usize::try_from(request.new_index).unwrap_or(0);
        self.board
            .lock()
            .unwrap()
            .move_task(
                &request.task_id,
                &request.source_col_id,
                &request.dest_col_id,
                index,
            )
            .map_err(|_| not_found("Column not found"))
    }

    async fn create_column(&self, column: &Column) -> Result<Column, ClientError> {
        self.write("Failed to create column")?;
        self.board.lock().unwrap().add_column(column.clone());
        Ok(column.clone())
    }

    async fn fetch_customers(&self) -> Result<Vec<Customer>, ClientError> {
        self.read("Failed to fetch customers")?;
        Ok(self.customers.lock().unwrap().clone())
    }

    async fn update_customer(&self, id: &str, updates: &Value) -> Result<Customer, ClientError> {
        self.write("Failed to update customer")?;
        let mut customers = self.customers.lock().unwrap();
        let current = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Customer not found"))?;
        *current = merge_fields_keep_id(&*current, updates, id).map_err(ClientError::InvalidUpdate)?;
        Ok(current.clone())
    }

    async fn update_user(&self, id: &str, updates: &Value) -> Result<UserProfile, ClientError> {
        self.write("Failed to update user")?;
        let mut users = self.users.lock().unwrap();
        let current = users.get(id).cloned().unwrap_or_else(|| UserProfile {
            id: id.to_string(),
            ..Default::default()
        });
        let user = merge_fields_keep_id(&current, updates, id).map_err(ClientError::InvalidUpdate)?;
        users.insert(id.to_string(), user.clone());
        Ok(user)
    }

    async fn upload_photo(
        &self,
        user_id: &str,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        self.write("Failed to upload photo")?;
        let url = format!("/api/photos/{}-{}", user_id, file_name);
        let mut users = self.users.lock().unwrap();
        let user = users.entry(user_id.to_string()).or_insert_with(|| UserProfile {
            id: user_id.to_string(),
            ..Default::default()
        });
        user.photo = Some(url.clone());
        Ok(url)
    }
}
