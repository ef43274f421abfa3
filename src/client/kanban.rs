//! Client-side mirror of the work board.

use serde_json::json;

use super::api::DashboardApi;
use super::optimistic::{SyncOutcome, apply_optimistic};
use crate::backend::api::MoveTaskRequest;
use crate::board::DropTarget;
use crate::errors::ClientError;
use crate::models::{Column, KanbanBoard, Task};

/// How many incomplete tasks the Today deck shows.
pub const ACTIVE_TASK_LIMIT: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct KanbanStore {
    pub board: KanbanBoard,
    pub is_loading: bool,
}

impl KanbanStore {
    /// Replace local state with the server's board.
    ///
    /// On failure the previous board is kept and the error returned.
    pub async fn load(&mut self, api: &dyn DashboardApi) -> Result<(), ClientError> {
        self.is_loading = true;
        let result = api.fetch_kanban().await;
        self.is_loading = false;
        self.board = result?;
        Ok(())
    }

    pub fn column_tasks(&self, column_id: &str) -> Vec<&Task> {
        self.board.column_tasks(column_id)
    }

    /// Columns in display order; ids without a column are skipped.
    pub fn ordered_columns(&self) -> Vec<&Column> {
        self.board
            .column_order
            .iter()
            .filter_map(|id| self.board.columns.get(id))
            .collect()
    }

    /// Incomplete tasks for the Today deck.
    pub fn active_tasks(&self) -> Vec<&Task> {
        self.board.active_tasks(ACTIVE_TASK_LIMIT)
    }

    pub fn resolve_drop(&self, active_id: &str, over_id: &str) -> Option<DropTarget> {
        self.board.resolve_drop(active_id, over_id)
    }

    /// Move a task between (or within) columns.
    ///
    /// Fails up front if either column is unknown or the task is not in the
    /// source column; nothing is sent in that case.
    pub async fn move_task(
        &mut self,
        api: &dyn DashboardApi,
        task_id: &str,
        source_col_id: &str,
        dest_col_id: &str,
        new_index: usize,
    ) -> Result<SyncOutcome, ClientError> {
        let source = self
            .board
            .columns
            .get(source_col_id)
            .ok_or_else(|| ClientError::ColumnNotFound {
                id: source_col_id.to_string(),
            })?;
        if !self.board.columns.contains_key(dest_col_id) {
            return Err(ClientError::ColumnNotFound {
                id: dest_col_id.to_string(),
            });
        }
        if !source.task_ids.iter().any(|id| id == task_id) {
            return Err(ClientError::TaskNotInColumn {
                task_id: task_id.to_string(),
                column_id: source_col_id.to_string(),
            });
        }

        let request = MoveTaskRequest {
            task_id: task_id.to_string(),
            source_col_id: source_col_id.to_string(),
            dest_col_id: dest_col_id.to_string(),
            new_index: i64::try_from(new_index).unwrap_or(i64::MAX),
        };
        apply_optimistic(
            "move task",
            &mut self.board,
            |board| {
                // Both columns were checked above.
                let _ = board.move_task(task_id, source_col_id, dest_col_id, new_index);
            },
            api.move_task(&request),
            || api.fetch_kanban(),
        )
        .await
    }

    /// Apply a drag-and-drop gesture. Returns `Ok(None)` when the drop does
    /// not resolve to a column, e.g. the card was released outside the board.
    pub async fn drop_task(
        &mut self,
        api: &dyn DashboardApi,
        active_id: &str,
        over_id: &str,
    ) -> Result<Option<SyncOutcome>, ClientError> {
        let Some(target) = self.resolve_drop(active_id, over_id) else {
            return Ok(None);
        };
        self.move_task(
            api,
            active_id,
            &target.source_column,
            &target.dest_column,
            target.index,
        )
        .await
        .map(Some)
    }

    /// Quick-add a task at the bottom of `column_id`.
    pub async fn add_task(
        &mut self,
        api: &dyn DashboardApi,
        column_id: &str,
        title: &str,
    ) -> Result<(Task, SyncOutcome), ClientError> {
        if !self.board.columns.contains_key(column_id) {
            return Err(ClientError::ColumnNotFound {
                id: column_id.to_string(),
            });
        }
        let task = Task::new(title);
        let outcome = apply_optimistic(
            "add task",
            &mut self.board,
            |board| {
                board.add_task(task.clone(), column_id);
            },
            api.create_task(&task, column_id),
            || api.fetch_kanban(),
        )
        .await?;
        Ok((task, outcome))
    }

    /// Flip a task's completion flag.
    pub async fn toggle_task(
        &mut self,
        api: &dyn DashboardApi,
        task_id: &str,
    ) -> Result<SyncOutcome, ClientError> {
        let completed = self
            .board
            .tasks
            .get(task_id)
            .map(|task| !task.completed)
            .ok_or_else(|| ClientError::TaskNotFound {
                id: task_id.to_string(),
            })?;
        let updates = json!({ "completed": completed });
        apply_optimistic(
            "toggle task",
            &mut self.board,
            |board| {
                if let Some(task) = board.tasks.get_mut(task_id) {
                    task.completed = completed;
                }
            },
            api.update_task(task_id, &updates),
            || api.fetch_kanban(),
        )
        .await
    }

    /// Remove a task from the map and from every column.
    pub async fn delete_task(
        &mut self,
        api: &dyn DashboardApi,
        task_id: &str,
    ) -> Result<SyncOutcome, ClientError> {
        apply_optimistic(
            "delete task",
            &mut self.board,
            |board| {
                board.delete_task(task_id);
            },
            api.delete_task(task_id),
            || api.fetch_kanban(),
        )
        .await
    }

    /// Append a new, empty column to the board.
    pub async fn add_column(
        &mut self,
        api: &dyn DashboardApi,
        title: &str,
    ) -> Result<(Column, SyncOutcome), ClientError> {
        let column = Column::new(title);
        let outcome = apply_optimistic(
            "add column",
            &mut self.board,
            |board| board.add_column(column.clone()),
            api.create_column(&column),
            || api.fetch_kanban(),
        )
        .await?;
        Ok((column, outcome))
    }
}
