use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// A card on the work board. Column membership lives in [`Column::task_ids`],
/// the task itself does not know which column holds it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Free-text label, not a reference into the customer list.
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    /// Keys this crate does not model, kept so writes round-trip them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub const UNASSIGNED_CUSTOMER: &'static str = "Unassigned";
    pub const NO_DUE_DATE: &'static str = "No Date";

    /// A fresh task with the defaults the board uses for quick-add.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            customer: Self::UNASSIGNED_CUSTOMER.to_string(),
            due_date: Self::NO_DUE_DATE.to_string(),
            priority: Priority::Medium,
            completed: false,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub task_ids: Vec<String>,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            task_ids: Vec::new(),
        }
    }
}

/// The whole work board as stored and as served by `GET /api/kanban`.
///
/// Both maps keep insertion order, which is the order the Today deck and
/// the stored document list them in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KanbanBoard {
    #[serde(default)]
    pub tasks: IndexMap<String, Task>,
    #[serde(default)]
    pub columns: IndexMap<String, Column>,
    #[serde(default)]
    pub column_order: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Meeting,
    Email,
    Call,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    /// Local timestamp, e.g. `2025-11-18T10:00:00`.
    pub date: String,
    #[serde(default)]
    pub notes: String,
}

impl TimelineEvent {
    pub fn timestamp(&self) -> Option<chrono::NaiveDateTime> {
        chrono::NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%dT%H:%M:%S").ok()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: String,
    /// Lifetime value, kept as a display label.
    #[serde(default)]
    pub ltv: String,
    #[serde(default)]
    pub segment: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    /// Timeline newest-first. Events with unparseable dates sort last.
    pub fn timeline_newest_first(&self) -> Vec<&TimelineEvent> {
        let mut events: Vec<&TimelineEvent> = self.timeline.iter().collect();
        events.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        events
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}
