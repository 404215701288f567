//! Key-value persistence port backing saved display orders.

use std::sync::Arc;

use crate::error::Result;

/// Synchronous string key-value storage.
///
/// Callers treat every failure as "nothing stored"; implementations may
/// still report errors so the boundary can log them.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Store name for logging/debugging.
    fn store_name(&self) -> &'static str;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn store_name(&self) -> &'static str {
        (**self).store_name()
    }
}
