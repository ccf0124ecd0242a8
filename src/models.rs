//! Data models for the budget tracker.
//!
//! This module contains the immutable [`Transaction`] record, its
//! identifier newtype, the [`TransactionType`] enumeration and the
//! [`Totals`] derived from a transaction list.

mod enums;
mod ids;
mod totals;
mod transaction;

pub use enums::{ParseTransactionTypeError, TransactionType};
pub use ids::TransactionId;
pub use totals::Totals;
pub use transaction::Transaction;
