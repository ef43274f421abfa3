//! Board mutations shared by the backend handlers and the client kanban store.
//!
//! Every operation works on a [`KanbanBoard`] in memory; persistence and
//! network round-trips are the caller's business.

use serde_json::Value;

use crate::errors::{BoardError, UpdateError};
use crate::models::{Column, KanbanBoard, Task};
use crate::util::merge_fields_keep_id;

/// Where a dragged card should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub source_column: String,
    pub dest_column: String,
    pub index: usize,
}

impl KanbanBoard {
    pub fn column_of(&self, task_id: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, col)| col.task_ids.iter().any(|id| id == task_id))
            .map(|(id, _)| id.as_str())
    }

    /// Tasks of a column in display order. Ids without a task are skipped.
    pub fn column_tasks(&self, column_id: &str) -> Vec<&Task> {
        self.columns
            .get(column_id)
            .map(|col| {
                col.task_ids
                    .iter()
                    .filter_map(|id| self.tasks.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Relocate `task_id` from `source` to `dest` at `new_index`.
    ///
    /// The id is removed from the source sequence first and only then
    /// inserted, so for a same-column move `new_index` addresses the
    /// sequence without the task. `new_index` past the end appends.
    /// Every occurrence of the id in the source is removed; whether the task
    /// was actually there is not checked here.
    pub fn move_task(
        &mut self,
        task_id: &str,
        source: &str,
        dest: &str,
        new_index: usize,
    ) -> Result<(), BoardError> {
        for column_id in [source, dest] {
            if !self.columns.contains_key(column_id) {
                return Err(BoardError::ColumnNotFound {
                    id: column_id.to_string(),
                });
            }
        }

        if let Some(col) = self.columns.get_mut(source) {
            col.task_ids.retain(|id| id != task_id);
        }
        if let Some(col) = self.columns.get_mut(dest) {
            let index = new_index.min(col.task_ids.len());
            col.task_ids.insert(index, task_id.to_string());
        }
        Ok(())
    }

    /// Store `task` and append it to `column_id`.
    ///
    /// An unknown column still keeps the task in the task map; it simply
    /// lands in no column. Returns whether the task was placed.
    pub fn add_task(&mut self, task: Task, column_id: &str) -> bool {
        let task_id = task.id.clone();
        self.tasks.insert(task_id.clone(), task);
        match self.columns.get_mut(column_id) {
            Some(col) => {
                col.task_ids.push(task_id);
                true
            }
            None => false,
        }
    }

    /// Shallow-merge `updates` into the task. The id cannot be changed.
    pub fn update_task(&mut self, task_id: &str, updates: &Value) -> Result<&Task, UpdateError> {
        let current = self
            .tasks
            .get(task_id)
            .ok_or_else(|| UpdateError::NotFound(BoardError::TaskNotFound {
                id: task_id.to_string(),
            }))?;
        let merged = merge_fields_keep_id(current, updates, task_id).map_err(UpdateError::Invalid)?;
        self.tasks.insert(task_id.to_string(), merged);
        Ok(&self.tasks[task_id])
    }

    /// Drop the task and scrub its id from every column.
    /// Returns whether the task map held it.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let existed = self.tasks.shift_remove(task_id).is_some();
        for col in self.columns.values_mut() {
            col.task_ids.retain(|id| id != task_id);
        }
        existed
    }

    /// Insert `column` and append it to the display order. Re-adding an
    /// existing id replaces the column but keeps its place in the order.
    pub fn add_column(&mut self, column: Column) {
        let column_id = column.id.clone();
        if self.columns.insert(column_id.clone(), column).is_none()
            || !self.column_order.contains(&column_id)
        {
            self.column_order.push(column_id);
        }
    }

    /// Incomplete tasks for the Today deck in insertion order, at most `limit`.
    pub fn active_tasks(&self, limit: usize) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|task| !task.completed)
            .take(limit)
            .collect()
    }

    /// Resolve a drag-and-drop gesture. `over_id` is either a column (drop
    /// on the column body, appends) or a task (drop onto that card's slot).
    pub fn resolve_drop(&self, active_id: &str, over_id: &str) -> Option<DropTarget> {
        let source_column = self.column_of(active_id)?.to_string();

        let (dest_column, index) = match self.columns.get(over_id) {
            Some(col) => (col.id.clone(), col.task_ids.len()),
            None => {
                let dest = self.column_of(over_id)?;
                let index = self.columns[dest]
                    .task_ids
                    .iter()
                    .position(|id| id == over_id)?;
                (dest.to_string(), index)
            }
        };

        Some(DropTarget {
            source_column,
            dest_column,
            index,
        })
    }

    /// Column ids that reference a task missing from the task map.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        self.columns
            .values()
            .flat_map(|col| {
                col.task_ids
                    .iter()
                    .filter(|id| !self.tasks.contains_key(*id))
                    .map(|id| (col.id.clone(), id.clone()))
            })
            .collect()
    }
}
