use serde_json::{Value, json};

use super::api::DashboardApi;
use super::optimistic::{SyncOutcome, apply_optimistic};
use crate::errors::ClientError;
use crate::models::{Customer, TimelineEvent};
use crate::util::merge_fields_keep_id;

/// Customer list plus the one currently shown in the Customers view.
#[derive(Debug, Clone, Default)]
pub struct CustomerStore {
    pub customers: Vec<Customer>,
    pub active_customer_id: Option<String>,
    pub is_loading: bool,
}

impl CustomerStore {
    /// Fetch all customers and activate the first one.
    pub async fn load(&mut self, api: &dyn DashboardApi) -> Result<(), ClientError> {
        self.is_loading = true;
        let result = api.fetch_customers().await;
        self.is_loading = false;
        self.customers = result?;
        self.active_customer_id = self.customers.first().map(|c| c.id.clone());
        Ok(())
    }

    pub fn active_customer(&self) -> Option<&Customer> {
        let id = self.active_customer_id.as_deref()?;
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn set_active(&mut self, id: &str) {
        self.active_customer_id = Some(id.to_string());
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn prev(&mut self) {
        self.step(-1);
    }

    /// Move the selection by `delta`, wrapping at both ends. An unknown
    /// active id counts as position -1, so `next` lands on the first customer.
    fn step(&mut self, delta: isize) {
        let len = self.customers.len() as isize;
        if len == 0 {
            return;
        }
        let current = self
            .active_customer_id
            .as_deref()
            .and_then(|id| self.customers.iter().position(|c| c.id == id))
            .map(|i| i as isize)
            .unwrap_or(-1);
        let index = (current + delta).rem_euclid(len) as usize;
        self.active_customer_id = Some(self.customers[index].id.clone());
    }

    /// Shallow-merge `updates` into the customer locally, then persist.
    /// A failed write reloads the whole list from the server, which also
    /// re-activates the first customer, exactly as [`load`](Self::load) does.
    pub async fn update_customer(
        &mut self,
        api: &dyn DashboardApi,
        id: &str,
        updates: Value,
    ) -> Result<SyncOutcome, ClientError> {
        let current = self
            .customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::CustomerNotFound { id: id.to_string() })?;
        let merged = merge_fields_keep_id(current, &updates, id).map_err(ClientError::InvalidUpdate)?;

        let outcome = apply_optimistic(
            "update customer",
            &mut self.customers,
            |customers| {
                if let Some(slot) = customers.iter_mut().find(|c| c.id == id) {
                    *slot = merged;
                }
            },
            api.update_customer(id, &updates),
            || api.fetch_customers(),
        )
        .await?;
        if !outcome.is_committed() {
            self.active_customer_id = self.customers.first().map(|c| c.id.clone());
        }
        Ok(outcome)
    }

    /// Append a timeline entry and persist the customer's whole timeline.
    pub async fn append_event(
        &mut self,
        api: &dyn DashboardApi,
        id: &str,
        event: TimelineEvent,
    ) -> Result<SyncOutcome, ClientError> {
        let mut timeline = self
            .customers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.timeline.clone())
            .ok_or_else(|| ClientError::CustomerNotFound { id: id.to_string() })?;
        timeline.push(event);
        self.update_customer(api, id, json!({ "timeline": timeline }))
            .await
    }

}
