//! Newtype wrapper for transaction identifiers.

use core::str::FromStr;

use uuid::Uuid;

/// Unique identifier for a transaction.
///
/// Generated once when the transaction is created and never reused.
/// Persisted in the canonical hyphenated lowercase UUID form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates an identifier from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(value: Uuid) -> Self {
        Self(value)
    }

    /// Generates a fresh random (v4) identifier.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its string form.
    ///
    /// Accepts every UUID spelling the `uuid` crate understands (hyphenated,
    /// simple, braced, URN).
    ///
    /// # Errors
    ///
    /// Returns [`uuid::Error`] if the string is not a UUID.
    #[inline]
    pub fn parse_str(input: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(input).map(Self)
    }

    /// Returns a reference to the inner UUID.
    #[inline]
    #[must_use]
    pub const fn as_inner(&self) -> &Uuid {
        &self.0
    }

    /// Consumes the wrapper and returns the inner UUID.
    #[inline]
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl core::fmt::Display for TransactionId {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl From<Uuid> for TransactionId {
    #[inline]
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_canonical_hyphenated() {
        let id = TransactionId::new(Uuid::from_u128(0x550e_8400_e29b_41d4_a716_4466_5544_0000));
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn parse_accepts_uppercase_and_braced() {
        let expected = TransactionId::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let upper: TransactionId = "550E8400-E29B-41D4-A716-446655440000".parse().unwrap();
        let braced = TransactionId::parse_str("{550e8400-e29b-41d4-a716-446655440000}").unwrap();
        assert_eq!(upper, expected);
        assert_eq!(braced, expected);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TransactionId::parse_str("tx-001").is_err());
        assert!(TransactionId::parse_str("").is_err());
    }

    #[test]
    fn generated_ids_are_distinct() {
        let first = TransactionId::generate();
        let second = TransactionId::generate();
        assert_ne!(first, second);
    }

    #[test]
    fn id_from_inner() {
        let uuid = Uuid::from_u128(7);
        let id: TransactionId = uuid.into();
        assert_eq!(*id.as_inner(), uuid);
        assert_eq!(id.into_inner(), uuid);
    }
}
