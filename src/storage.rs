//! Pluggable key-value storage and the transaction store built on it.
//!
//! A [`KeyValueStore`] is the persistent medium: one string value per
//! string key. [`TransactionStore`] keeps the whole transaction list as a
//! single blob under one well-known key and replaces it on every save.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStore;
pub use memory::InMemoryStore;

use crate::codec;
use crate::error::Result;
use crate::models::Transaction;

/// Key under which the transaction list is stored.
pub const STORAGE_KEY: &str = "transactions";

/// Blocking key-value medium for persisted blobs.
///
/// All methods take `&self`; implementations use interior mutability
/// (e.g. `Mutex`) for mutation. Writes are last-writer-wins.
pub trait KeyValueStore: core::fmt::Debug + Send + Sync {
    /// Returns the value stored under `key`, or `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads and writes the full transaction list under a single key.
#[derive(Debug)]
pub struct TransactionStore<S: KeyValueStore> {
    /// Underlying medium.
    backend: S,
    /// Key holding the serialized list.
    key: String,
}

impl<S: KeyValueStore> TransactionStore<S> {
    /// Creates a store using [`STORAGE_KEY`].
    #[inline]
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    /// Creates a store using a custom key.
    #[inline]
    #[must_use]
    pub fn with_key<K: Into<String>>(backend: S, key: K) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Returns the key holding the transaction list.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns a reference to the underlying medium.
    #[inline]
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Loads every stored transaction, in stored order.
    ///
    /// An absent key or an empty value yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read, or a corrupt-data
    /// error (see [`crate::error::BudgetError::is_corrupt_data`]) if the
    /// blob cannot be decoded.
    #[inline]
    #[tracing::instrument(skip_all, fields(key = %self.key))]
    pub fn load(&self) -> Result<Vec<Transaction>> {
        let transactions = match self.backend.get(&self.key)? {
            None => Vec::new(),
            Some(blob) if blob.is_empty() => Vec::new(),
            Some(blob) => codec::decode_all(&blob)?,
        };
        tracing::debug!(count = transactions.len(), "transactions loaded");
        Ok(transactions)
    }

    /// Replaces the stored list with `transactions`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the backend fails to write.
    #[inline]
    #[tracing::instrument(skip_all, fields(key = %self.key))]
    pub fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let blob = codec::encode_all(transactions)?;
        self.backend.set(&self.key, &blob)?;
        tracing::debug!(count = transactions.len(), "transactions saved");
        Ok(())
    }

    /// Removes the stored list entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    #[inline]
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BudgetError;
    use crate::models::{TransactionId, TransactionType};
    use chrono::DateTime;

    fn tx(description: &str, kind: TransactionType) -> Transaction {
        Transaction::new(
            TransactionId::generate(),
            DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
            description.to_owned(),
            10.0,
            kind,
        )
    }

    #[test]
    fn absent_key_loads_empty() {
        let store = TransactionStore::new(InMemoryStore::new());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn empty_value_loads_empty() {
        let backend = InMemoryStore::new();
        backend.set(STORAGE_KEY, "").unwrap();
        let store = TransactionStore::new(backend);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let store = TransactionStore::new(InMemoryStore::new());
        let txs = vec![
            tx("Rent", TransactionType::Expense),
            tx("Salary", TransactionType::Income),
            tx("Coffee", TransactionType::Expense),
        ];
        store.save(&txs).unwrap();
        assert_eq!(store.load().unwrap(), txs);
    }

    #[test]
    fn load_is_idempotent() {
        let store = TransactionStore::new(InMemoryStore::new());
        store.save(&[tx("Rent", TransactionType::Expense)]).unwrap();
        assert_eq!(store.load().unwrap(), store.load().unwrap());
    }

    #[test]
    fn save_replaces_previous_value() {
        let store = TransactionStore::new(InMemoryStore::new());
        store
            .save(&[tx("A", TransactionType::Expense), tx("B", TransactionType::Expense)])
            .unwrap();
        let only = vec![tx("C", TransactionType::Income)];
        store.save(&only).unwrap();
        assert_eq!(store.load().unwrap(), only);
    }

    #[test]
    fn save_writes_under_configured_key() {
        let store = TransactionStore::with_key(InMemoryStore::new(), "ledger");
        store.save(&[]).unwrap();
        assert_eq!(store.key(), "ledger");
        assert_eq!(store.backend().get("ledger").unwrap().as_deref(), Some("[]"));
        assert!(store.backend().get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn malformed_blob_is_corrupt_data() {
        let backend = InMemoryStore::new();
        backend.set(STORAGE_KEY, "[{broken").unwrap();
        let store = TransactionStore::new(backend);
        let err = store.load().unwrap_err();
        assert!(matches!(err, BudgetError::Serialization(_)));
        assert!(err.is_corrupt_data());
    }

    #[test]
    fn clear_removes_list() {
        let store = TransactionStore::new(InMemoryStore::new());
        store.save(&[tx("A", TransactionType::Expense)]).unwrap();
        store.clear().unwrap();
        assert!(store.backend().get(STORAGE_KEY).unwrap().is_none());
        assert!(store.load().unwrap().is_empty());
    }
}
