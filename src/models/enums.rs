//! Enumeration types for constrained values.

use core::str::FromStr;

/// Direction of a money movement.
///
/// The amount of a transaction is always a magnitude; whether it adds to or
/// subtracts from the balance is decided by this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Money spent.
    #[default]
    Expense,
    /// Money received.
    Income,
}

impl TransactionType {
    /// Returns the literal name used in storage and on screen.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Income => "Income",
        }
    }
}

impl core::fmt::Display for TransactionType {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names neither transaction type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction type {0:?}, expected \"expense\" or \"income\"")]
pub struct ParseTransactionTypeError(String);

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    /// Strict, case-insensitive parse for user input.
    ///
    /// The persisted form is decoded leniently by [`crate::codec`] instead.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            name if name.eq_ignore_ascii_case("expense") => Ok(Self::Expense),
            name if name.eq_ignore_ascii_case("income") => Ok(Self::Income),
            other => Err(ParseTransactionTypeError(other.to_owned())),
        }
    }
}
