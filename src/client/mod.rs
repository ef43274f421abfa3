//! Client-side state stores for the dashboard views.
//!
//! Each store is a plain struct with synchronous transitions. Stores that
//! mirror server data (`kanban`, `customers`, `user`) also have async
//! actions that take a [`DashboardApi`] and follow the optimistic pattern in
//! [`optimistic`]: change local state first, write, resynchronise on failure.
//!
//! | Module       | State                                   | Persisted as               |
//! |--------------|-----------------------------------------|----------------------------|
//! | `kanban`     | board, loading flag                     | server                     |
//! | `customers`  | customer list, active customer          | server                     |
//! | `user`       | profile, onboarded flag                 | `helix-user-storage`       |
//! | `navigation` | current page, history                   | `helix-navigation-storage` |
//! | `layout`     | insight ribbon / right rail visibility  | `helix-layout-storage`     |
//! | `guide`      | active tour, step, completed tours      | `helix-guide-storage`      |
//! | `command`    | palette open flag, query                | not persisted              |
//! | `onboarding` | wizard step, form                       | not persisted              |

pub mod api;
pub mod command;
pub mod customers;
pub mod guide;
pub mod kanban;
pub mod layout;
pub mod navigation;
pub mod onboarding;
pub mod optimistic;
pub mod persist;
pub mod user;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{DashboardApi, HttpApi};
pub use optimistic::SyncOutcome;
