//! HelixDesk API back-end.
//!
//! ## Overview
//!
//! A small REST service over a single JSON document holding customers,
//! the Kanban board and user profiles. Every request loads the whole
//! document, applies one change and writes the whole document back.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐   HTTP   ┌──────────────────────────────────────────────┐
//! │  Client  │ ───────> │  server.rs  (axum Router, ServerConfig)      │
//! │  stores  │ <─────── │    └─ api.rs  (route handlers, AppState)     │
//! └──────────┘          │         │                                    │
//!                       │         │ StoreHandle::modify()              │
//!                       │         v                                    │
//!                       │  store.rs  (FlatFileStore, Document)         │
//!                       └──────────────────────────────────────────────┘
//! ```
//!
//! ## Typical Request Flow (drag a task to another column)
//!
//! 1. `PUT /api/kanban/move` → `api::move_task()`
//! 2. `StoreHandle::modify()` reads the document on the blocking pool
//! 3. `KanbanBoard::move_task()` splices the id between the columns
//! 4. The document is written to a temp file and renamed over the original
//!
//! Overlapping requests are not serialised; the last full write wins.

pub mod api;
pub mod server;
pub mod store;
