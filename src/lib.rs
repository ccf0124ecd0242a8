//! Personal budget tracker core.
//!
//! Transactions are entered through a small, closed set of messages
//! ([`update::Msg`]), folded into an immutable [`update::Model`] by a pure
//! reducer, and persisted as one JSON blob under a single key of any
//! [`storage::KeyValueStore`]. [`program::Program`] ties the pieces
//! together and guarantees that every change to the transaction list is
//! saved before the next message is handled.

pub mod codec;
pub mod error;
pub mod models;
pub mod program;
pub mod storage;
pub mod update;
