//! Conversion between [`Transaction`] and its persisted form.
//!
//! The persisted form is a flat, string-safe record:
//!
//! ```json
//! {
//!   "Id": "550e8400-e29b-41d4-a716-446655440000",
//!   "Date": "2024-01-15T10:30:00.123Z",
//!   "Description": "Coffee",
//!   "Amount": 3.5,
//!   "Type": "Expense"
//! }
//! ```
//!
//! A whole transaction list is stored as a JSON array of such records.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Transaction, TransactionId, TransactionType};

/// Fallback layout for timestamps persisted without a UTC offset.
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The on-storage shape of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersistedTransaction {
    /// Canonical UUID string.
    pub id: String,
    /// RFC 3339 timestamp with millisecond precision.
    pub date: String,
    /// Description as entered.
    pub description: String,
    /// Amount magnitude.
    pub amount: f64,
    /// `"Expense"` or `"Income"`.
    #[serde(rename = "Type")]
    pub kind: String,
}

/// Converts a persisted record into a [`Transaction`].
///
/// The type string is decoded leniently: `"Expense"` is an expense and every
/// other value becomes [`TransactionType::Income`]. Values that are neither
/// literal are logged.
///
/// # Errors
///
/// Returns [`crate::error::BudgetError::InvalidId`] or
/// [`crate::error::BudgetError::InvalidDate`] if the identifier or date
/// cannot be parsed.
#[inline]
pub fn decode(persisted: PersistedTransaction) -> Result<Transaction> {
    let id = TransactionId::parse_str(&persisted.id)?;
    let date = parse_date(&persisted.date)?;
    let kind = decode_type(&persisted.kind);
    Ok(Transaction::new(
        id,
        date,
        persisted.description,
        persisted.amount,
        kind,
    ))
}

/// Converts a [`Transaction`] into its persisted record.
#[inline]
#[must_use]
pub fn encode(transaction: &Transaction) -> PersistedTransaction {
    PersistedTransaction {
        id: transaction.id().to_string(),
        date: format_date(transaction.date()),
        description: transaction.description().to_owned(),
        amount: transaction.amount(),
        kind: transaction.kind().as_str().to_owned(),
    }
}

/// Serializes a full transaction list into one blob, preserving order.
///
/// # Errors
///
/// Returns [`crate::error::BudgetError::Serialization`] if JSON encoding
/// fails (for example on a non-finite amount).
#[inline]
pub fn encode_all(transactions: &[Transaction]) -> Result<String> {
    let records: Vec<PersistedTransaction> = transactions.iter().map(encode).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parses a blob produced by [`encode_all`] back into transactions, in the
/// stored order.
///
/// # Errors
///
/// Returns an error if the blob is not a JSON array of persisted records or
/// any record fails to [`decode`].
#[inline]
pub fn decode_all(blob: &str) -> Result<Vec<Transaction>> {
    let records: Vec<PersistedTransaction> = serde_json::from_str(blob)?;
    records.into_iter().map(decode).collect()
}

/// Formats a timestamp in the stable, sortable persisted layout.
#[inline]
#[must_use]
pub fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a persisted timestamp.
///
/// RFC 3339 with any offset is accepted and normalized to UTC. A timestamp
/// without an offset is taken as UTC.
///
/// # Errors
///
/// Returns [`crate::error::BudgetError::InvalidDate`] if neither layout
/// matches.
#[inline]
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(input) {
        Ok(date) => Ok(date.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(input, NAIVE_DATE_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_naive_err| rfc_err.into()),
    }
}

/// Maps a persisted type string onto [`TransactionType`].
fn decode_type(raw: &str) -> TransactionType {
    match raw {
        "Expense" => TransactionType::Expense,
        "Income" => TransactionType::Income,
        other => {
            tracing::warn!(value = %other, "unrecognized transaction type, treating as income");
            TransactionType::Income
        }
    }
}
