//! Transaction model.

use chrono::{DateTime, Utc};

use super::{TransactionId, TransactionType};

/// A single recorded money movement.
///
/// Transactions are immutable once created: there are no setters, and a
/// change is expressed by removing the transaction and creating a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Unique identifier.
    id: TransactionId,
    /// Creation timestamp.
    date: DateTime<Utc>,
    /// User supplied description.
    description: String,
    /// Magnitude of the movement (>= 0).
    amount: f64,
    /// Whether the movement is an expense or an income.
    kind: TransactionType,
}

impl Transaction {
    /// Creates a transaction from its parts.
    #[inline]
    #[must_use]
    pub const fn new(
        id: TransactionId,
        date: DateTime<Utc>,
        description: String,
        amount: f64,
        kind: TransactionType,
    ) -> Self {
        Self {
            id,
            date,
            description,
            amount,
            kind,
        }
    }

    /// Returns the identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the creation timestamp.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the amount (always a magnitude).
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> f64 {
        self.amount
    }

    /// Returns the transaction type.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> TransactionType {
        self.kind
    }

    /// Returns the amount with the sign implied by the type: negative for
    /// expenses, positive for income.
    #[inline]
    #[must_use]
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Expense => -self.amount,
            TransactionType::Income => self.amount,
        }
    }
}
