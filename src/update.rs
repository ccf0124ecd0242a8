//! Application state and the reducer that advances it.
//!
//! [`update`] is a pure function from the current [`Model`] and a [`Msg`]
//! to the next model plus a [`Cmd`] describing the persistence it needs.
//! Executing that command is the job of [`crate::program::Program`].

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::EntryError;
use crate::models::{Totals, Transaction, TransactionId, TransactionType};

/// Number of fractional second digits kept in timestamps; matches the
/// persisted date layout so a reload yields identical transactions.
const TIMESTAMP_DIGITS: u16 = 3;

/// Complete application state between two messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Recorded transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// Raw description text of the pending entry.
    pub description_input: String,
    /// Raw amount text of the pending entry.
    pub amount_input: String,
    /// Type selected for the next entry.
    pub type_input: TransactionType,
}

impl Model {
    /// Creates a model holding `transactions` and an empty entry form.
    #[inline]
    #[must_use]
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            ..Self::default()
        }
    }

    /// Returns the totals of the current transactions.
    #[inline]
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::from_transactions(&self.transactions)
    }

    /// Looks up a transaction by id.
    #[inline]
    #[must_use]
    pub fn find(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id() == id)
    }

    /// Checks whether the pending entry would be accepted by
    /// [`Msg::AddTransaction`].
    ///
    /// Returns the trimmed description and the parsed amount.
    ///
    /// # Errors
    ///
    /// Returns the first [`EntryError`] found, checking the amount before
    /// the description.
    #[inline]
    pub fn validate_entry(&self) -> Result<(&str, f64), EntryError> {
        let amount = parse_amount(&self.amount_input)?;
        let description = self.description_input.trim();
        if description.is_empty() {
            return Err(EntryError::EmptyDescription);
        }
        Ok((description, amount))
    }
}

/// Events accepted by [`update`]. There is no other way to change a
/// [`Model`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Replace the description input verbatim.
    SetDescription(String),
    /// Replace the amount input verbatim.
    SetAmount(String),
    /// Select the type of the next entry.
    SetType(TransactionType),
    /// Turn the pending entry into a transaction, if it is valid.
    AddTransaction,
    /// Remove the transaction with the given id.
    DeleteTransaction(TransactionId),
}

/// Side effect requested by [`update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Cmd {
    /// Nothing to do.
    None,
    /// Persist the full transaction list of the returned model.
    Save,
}

/// Source of time and identifiers for new transactions.
pub trait Environment {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// A fresh identifier, never returned before.
    fn next_id(&self) -> TransactionId;
}

/// [`Environment`] backed by the system clock and random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    #[inline]
    fn next_id(&self) -> TransactionId {
        TransactionId::generate()
    }
}

/// Computes the model that follows `model` after `msg`.
///
/// Input messages only touch the entry form and never ask for a save.
/// A valid [`Msg::AddTransaction`] prepends a new transaction, clears the
/// description and amount inputs and requests a save; an invalid one
/// returns the model unchanged. [`Msg::DeleteTransaction`] requests a save
/// only when a transaction was actually removed.
#[inline]
pub fn update<E: Environment>(model: &Model, msg: Msg, env: &E) -> (Model, Cmd) {
    match msg {
        Msg::SetDescription(text) => (
            Model {
                description_input: text,
                ..model.clone()
            },
            Cmd::None,
        ),
        Msg::SetAmount(text) => (
            Model {
                amount_input: text,
                ..model.clone()
            },
            Cmd::None,
        ),
        Msg::SetType(kind) => (
            Model {
                type_input: kind,
                ..model.clone()
            },
            Cmd::None,
        ),
        Msg::AddTransaction => add_transaction(model, env),
        Msg::DeleteTransaction(id) => delete_transaction(model, id),
    }
}

/// Handles [`Msg::AddTransaction`].
fn add_transaction<E: Environment>(model: &Model, env: &E) -> (Model, Cmd) {
    let (description, amount) = match model.validate_entry() {
        Ok(entry) => entry,
        Err(err) => {
            tracing::debug!(reason = %err, "entry rejected");
            return (model.clone(), Cmd::None);
        }
    };

    let transaction = Transaction::new(
        env.next_id(),
        env.now().trunc_subsecs(TIMESTAMP_DIGITS),
        description.to_owned(),
        amount,
        model.type_input,
    );
    tracing::debug!(id = %transaction.id(), kind = %transaction.kind(), "transaction added");

    let mut transactions = Vec::with_capacity(model.transactions.len() + 1);
    transactions.push(transaction);
    transactions.extend(model.transactions.iter().cloned());

    (
        Model {
            transactions,
            description_input: String::new(),
            amount_input: String::new(),
            type_input: model.type_input,
        },
        Cmd::Save,
    )
}

/// Handles [`Msg::DeleteTransaction`].
fn delete_transaction(model: &Model, id: TransactionId) -> (Model, Cmd) {
    let transactions: Vec<Transaction> = model
        .transactions
        .iter()
        .filter(|tx| tx.id() != id)
        .cloned()
        .collect();

    if transactions.len() == model.transactions.len() {
        tracing::debug!(%id, "delete of unknown transaction ignored");
        return (model.clone(), Cmd::None);
    }

    tracing::debug!(%id, "transaction deleted");
    (
        Model {
            transactions,
            ..model.clone()
        },
        Cmd::Save,
    )
}

/// Parses an amount input as a finite, non-negative real number.
///
/// Surrounding whitespace is ignored; scientific notation is accepted.
fn parse_amount(input: &str) -> Result<f64, EntryError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_parse_err| EntryError::InvalidAmount(input.to_owned()))?;
    if !amount.is_finite() {
        return Err(EntryError::NonFiniteAmount);
    }
    if amount.is_sign_negative() && amount != 0.0 {
        return Err(EntryError::NegativeAmount);
    }
    // Normalize -0.0 so it never displays as a negative amount.
    Ok(amount.abs())
}
