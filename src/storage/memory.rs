//! In-memory storage backend.
//!
//! Provides [`InMemoryStore`], a thread-safe in-memory implementation of
//! [`super::KeyValueStore`]. Useful for tests and for embedding the
//! tracker where nothing should touch the disk.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{BudgetError, Result};

/// Thread-safe in-memory key-value store.
///
/// # Example
///
/// ```rust
/// use budget_buddy::storage::{InMemoryStore, KeyValueStore};
///
/// let store = InMemoryStore::new();
/// store.set("transactions", "[]").unwrap();
/// assert_eq!(store.get("transactions").unwrap().as_deref(), Some("[]"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// All values behind a single mutex for interior mutability.
    inner: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> BudgetError {
    BudgetError::Storage(err.to_string().into())
}

impl super::KeyValueStore for InMemoryStore {
    #[inline]
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_lock(|inner| inner.get(key).cloned())
    }

    #[inline]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_lock(|inner| {
            let _previous = inner.insert(key.to_owned(), value.to_owned());
        })
    }

    #[inline]
    fn remove(&self, key: &str) -> Result<()> {
        self.with_lock(|inner| {
            let _previous = inner.remove(key);
        })
    }
}
