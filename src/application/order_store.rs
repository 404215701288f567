//! Persisted display orders.
//!
//! Orders are best-effort: a missing, unreadable or corrupt entry reads as
//! "no saved order" and a failed write is logged and forgotten. Nothing in
//! here ever surfaces an error to the caller.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::HostId;
use crate::port::KeyValueStore;

/// Key namespace shared by every saved order.
pub const ORDER_NAMESPACE: &str = "modelfleet.order";

/// Saved host and per-host instance orders on top of a [`KeyValueStore`].
#[derive(Clone)]
pub struct OrderStore {
    store: Arc<dyn KeyValueStore>,
}

impl OrderStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage key of the global host order.
    #[must_use]
    pub fn host_key() -> String {
        format!("{ORDER_NAMESPACE}.hosts")
    }

    /// Storage key of one host's instance order.
    #[must_use]
    pub fn instance_key(host_id: &HostId) -> String {
        format!("{ORDER_NAMESPACE}.instances.{host_id}")
    }

    #[must_use]
    pub fn read_host_order(&self) -> Vec<String> {
        self.read(&Self::host_key())
    }

    pub fn write_host_order(&self, order: &[String]) {
        self.write(&Self::host_key(), order);
    }

    #[must_use]
    pub fn read_instance_order(&self, host_id: &HostId) -> Vec<String> {
        self.read(&Self::instance_key(host_id))
    }

    pub fn write_instance_order(&self, host_id: &HostId, order: &[String]) {
        self.write(&Self::instance_key(host_id), order);
    }

    fn read(&self, key: &str) -> Vec<String> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    store = self.store.store_name(),
                    key,
                    error = %err,
                    "Failed to read saved order, using none"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(order) => order,
            Err(err) => {
                debug!(key, error = %err, "Discarding unparsable saved order");
                Vec::new()
            }
        }
    }

    fn write(&self, key: &str, order: &[String]) {
        let raw = match serde_json::to_string(order) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "Failed to encode order");
                return;
            }
        };
        if let Err(err) = self.store.set(key, &raw) {
            warn!(
                store = self.store.store_name(),
                key,
                error = %err,
                "Failed to persist order"
            );
        }
    }
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore")
            .field("store", &self.store.store_name())
            .finish()
    }
}
