//! Error types for the budget tracker.

/// All errors that can occur while loading, decoding or persisting
/// transactions.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted transaction identifier is not a valid UUID.
    #[error("invalid transaction id: {0}")]
    InvalidId(#[from] uuid::Error),

    /// A persisted transaction date could not be parsed.
    #[error("invalid transaction date: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    /// Storage backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// The storage key cannot be used by the backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

impl BudgetError {
    /// Returns `true` if the error was caused by malformed stored data
    /// rather than a failing backend.
    #[inline]
    #[must_use]
    pub const fn is_corrupt_data(&self) -> bool {
        matches!(
            *self,
            Self::Serialization(_) | Self::InvalidId(_) | Self::InvalidDate(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, BudgetError>;

/// Reasons a pending entry cannot become a transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    /// The description is empty after trimming.
    #[error("description must not be empty")]
    EmptyDescription,

    /// The amount input is not a number.
    #[error("amount {0:?} is not a number")]
    InvalidAmount(String),

    /// The amount is below zero; the sign is carried by the type.
    #[error("amount must not be negative")]
    NegativeAmount,

    /// The amount is infinite or NaN.
    #[error("amount must be finite")]
    NonFiniteAmount,
}
