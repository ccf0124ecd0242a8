//! Runtime that owns the store and the current model.
//!
//! A [`Program`] loads the persisted transactions once at startup, then
//! feeds every [`Msg`] through [`update`] and performs the requested save
//! before returning, so the model never drifts from what is stored.

use crate::error::{BudgetError, Result};
use crate::models::Totals;
use crate::storage::{KeyValueStore, TransactionStore};
use crate::update::{Cmd, Environment, Model, Msg, SystemEnvironment, update};

/// Message loop over a [`TransactionStore`].
///
/// Messages are processed strictly one at a time (`dispatch` takes
/// `&mut self`).
///
/// # Examples
///
/// ```
/// use budget_buddy::models::TransactionType;
/// use budget_buddy::program::Program;
/// use budget_buddy::storage::InMemoryStore;
/// use budget_buddy::update::Msg;
///
/// let mut program = Program::init(InMemoryStore::new()).unwrap();
/// program.dispatch(Msg::SetDescription("Coffee".to_owned())).unwrap();
/// program.dispatch(Msg::SetAmount("3.5".to_owned())).unwrap();
/// program.dispatch(Msg::SetType(TransactionType::Expense)).unwrap();
/// program.dispatch(Msg::AddTransaction).unwrap();
///
/// assert_eq!(program.model().transactions.len(), 1);
/// assert!((program.totals().balance() + 3.5).abs() < f64::EPSILON);
/// ```
#[derive(Debug)]
pub struct Program<S: KeyValueStore, E: Environment = SystemEnvironment> {
    /// Persistence for the transaction list.
    store: TransactionStore<S>,
    /// Clock and id source for new transactions.
    env: E,
    /// Current state.
    model: Model,
    /// Error that made startup fall back to an empty list, if any.
    load_warning: Option<BudgetError>,
}

impl<S: KeyValueStore> Program<S> {
    /// Starts a program on `backend` with the system clock and random ids.
    ///
    /// # Errors
    ///
    /// See [`Program::with_environment`].
    #[inline]
    pub fn init(backend: S) -> Result<Self> {
        Self::with_environment(TransactionStore::new(backend), SystemEnvironment)
    }
}

impl<S: KeyValueStore, E: Environment> Program<S, E> {
    /// Starts a program on `store` using `env` for new transactions.
    ///
    /// Stored data that cannot be decoded does not abort startup: the
    /// program starts with no transactions and keeps the error available
    /// through [`Program::load_warning`]. The corrupt blob is left in place
    /// until the next save replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend itself fails to read.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub fn with_environment(store: TransactionStore<S>, env: E) -> Result<Self> {
        let (transactions, load_warning) = match store.load() {
            Ok(transactions) => (transactions, None),
            Err(err) if err.is_corrupt_data() => {
                tracing::warn!(
                    error = %err,
                    key = store.key(),
                    "stored transactions are corrupt, starting empty"
                );
                (Vec::new(), Some(err))
            }
            Err(err) => return Err(err),
        };
        Ok(Self {
            store,
            env,
            model: Model::with_transactions(transactions),
            load_warning,
        })
    }

    /// Returns the current model.
    #[inline]
    #[must_use]
    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the totals of the current transactions, computed afresh.
    #[inline]
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.model.totals()
    }

    /// Returns the error that was tolerated while loading, if any.
    #[inline]
    #[must_use]
    pub const fn load_warning(&self) -> Option<&BudgetError> {
        self.load_warning.as_ref()
    }

    /// Returns the transaction store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &TransactionStore<S> {
        &self.store
    }

    /// Processes one message.
    ///
    /// When the transition changes the transaction list, the whole list is
    /// saved exactly once before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the save fails. The current model is then left
    /// as it was, matching what is still persisted.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub fn dispatch(&mut self, msg: Msg) -> Result<()> {
        let (next, cmd) = update(&self.model, msg, &self.env);
        match cmd {
            Cmd::None => {}
            Cmd::Save => {
                self.store.save(&next.transactions)?;
                self.load_warning = None;
            }
        }
        self.model = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::models::{Transaction, TransactionId, TransactionType};
    use crate::storage::{InMemoryStore, STORAGE_KEY};
    use chrono::DateTime;
    use std::sync::Mutex;

    /// Backend that records every write and can be told to fail.
    #[derive(Debug, Default)]
    struct RecordingStore {
        /// Backing values.
        inner: InMemoryStore,
        /// Every value passed to `set`, in order.
        writes: Mutex<Vec<String>>,
        /// Fail all writes when set.
        fail_writes: bool,
        /// Fail all reads when set.
        fail_reads: bool,
    }

    impl RecordingStore {
        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl KeyValueStore for RecordingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(BudgetError::Storage("disk unavailable".into()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(BudgetError::Storage("quota exceeded".into()));
            }
            self.writes.lock().unwrap().push(value.to_owned());
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    fn program(backend: RecordingStore) -> Program<RecordingStore> {
        Program::init(backend).unwrap()
    }

    fn add(program: &mut Program<RecordingStore>, description: &str, amount: &str) {
        program
            .dispatch(Msg::SetDescription(description.to_owned()))
            .unwrap();
        program.dispatch(Msg::SetAmount(amount.to_owned())).unwrap();
        program.dispatch(Msg::AddTransaction).unwrap();
    }

    fn stored_tx(description: &str) -> Transaction {
        Transaction::new(
            TransactionId::generate(),
            DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            description.to_owned(),
            5.0,
            TransactionType::Income,
        )
    }

    #[test]
    fn init_on_empty_store() {
        let program = program(RecordingStore::default());
        assert_eq!(*program.model(), Model::default());
        assert!(program.load_warning().is_none());
        assert!(program.store().backend().writes().is_empty());
    }

    #[test]
    fn init_loads_persisted_transactions() {
        let backend = RecordingStore::default();
        let existing = vec![stored_tx("Salary"), stored_tx("Gift")];
        backend
            .inner
            .set(STORAGE_KEY, &codec::encode_all(&existing).unwrap())
            .unwrap();
        let program = program(backend);
        assert_eq!(program.model().transactions, existing);
        assert_eq!(program.model().type_input, TransactionType::Expense);
    }

    #[test]
    fn init_falls_back_on_corrupt_store() {
        let backend = RecordingStore::default();
        backend.inner.set(STORAGE_KEY, "not json").unwrap();
        let program = program(backend);
        assert!(program.model().transactions.is_empty());
        assert!(program.load_warning().unwrap().is_corrupt_data());
    }

    #[test]
    fn init_propagates_backend_failure() {
        let backend = RecordingStore {
            fail_reads: true,
            ..RecordingStore::default()
        };
        let err = Program::init(backend).unwrap_err();
        assert!(matches!(err, BudgetError::Storage(_)));
    }

    #[test]
    fn input_messages_never_save() {
        let mut program = program(RecordingStore::default());
        program.dispatch(Msg::SetDescription("x".to_owned())).unwrap();
        program.dispatch(Msg::SetAmount("1".to_owned())).unwrap();
        program
            .dispatch(Msg::SetType(TransactionType::Income))
            .unwrap();
        assert!(program.store().backend().writes().is_empty());
    }

    #[test]
    fn add_saves_exactly_once_with_full_list() {
        let mut program = program(RecordingStore::default());
        add(&mut program, "Coffee", "3.5");
        add(&mut program, "Salary", "1000");

        let writes = program.store().backend().writes();
        assert_eq!(writes.len(), 2);
        let persisted = codec::decode_all(writes.last().unwrap()).unwrap();
        assert_eq!(persisted, program.model().transactions);
        assert_eq!(program.store().load().unwrap(), program.model().transactions);
    }

    #[test]
    fn reloaded_list_matches_model_at_full_precision() {
        let mut program = program(RecordingStore::default());
        add(&mut program, "Rent", "212918.90726713458");
        add(&mut program, "Groceries", "394301.33835633675");
        add(&mut program, "Fees", "0.30000000000000004");

        let reloaded = program.store().load().unwrap();
        assert_eq!(reloaded, program.model().transactions);
        assert_eq!(
            reloaded[2].amount().to_bits(),
            212_918.907_267_134_58_f64.to_bits()
        );
    }

    #[test]
    fn rejected_add_does_not_save() {
        let mut program = program(RecordingStore::default());
        program.dispatch(Msg::SetAmount("abc".to_owned())).unwrap();
        program.dispatch(Msg::AddTransaction).unwrap();
        assert!(program.model().transactions.is_empty());
        assert!(program.store().backend().writes().is_empty());
    }

    #[test]
    fn delete_saves_remaining_in_order() {
        let mut program = program(RecordingStore::default());
        add(&mut program, "C", "3");
        add(&mut program, "B", "2");
        add(&mut program, "A", "1");
        let ids: Vec<TransactionId> = program
            .model()
            .transactions
            .iter()
            .map(Transaction::id)
            .collect();

        program.dispatch(Msg::DeleteTransaction(ids[1])).unwrap();

        let writes = program.store().backend().writes();
        assert_eq!(writes.len(), 4);
        let expected = [&program.model().transactions[0], &program.model().transactions[1]]
            .map(codec::encode);
        let persisted: Vec<codec::PersistedTransaction> =
            serde_json::from_str(writes.last().unwrap()).unwrap();
        assert_eq!(persisted, expected.to_vec());
        assert_eq!(persisted[0].id, ids[0].to_string());
        assert_eq!(persisted[1].id, ids[2].to_string());
    }

    #[test]
    fn delete_unknown_id_does_not_save() {
        let mut program = program(RecordingStore::default());
        add(&mut program, "Coffee", "3.5");
        program
            .dispatch(Msg::DeleteTransaction(TransactionId::generate()))
            .unwrap();
        assert_eq!(program.model().transactions.len(), 1);
        assert_eq!(program.store().backend().writes().len(), 1);
    }

    #[test]
    fn failed_save_keeps_previous_model() {
        let mut program = program(RecordingStore {
            fail_writes: true,
            ..RecordingStore::default()
        });
        program.dispatch(Msg::SetDescription("Coffee".to_owned())).unwrap();
        program.dispatch(Msg::SetAmount("3.5".to_owned())).unwrap();
        let err = program.dispatch(Msg::AddTransaction).unwrap_err();

        assert!(err.to_string().contains("quota exceeded"));
        assert!(program.model().transactions.is_empty());
        assert_eq!(program.model().description_input, "Coffee");
    }

    #[test]
    fn successful_save_clears_load_warning() {
        let backend = RecordingStore::default();
        backend.inner.set(STORAGE_KEY, "[{").unwrap();
        let mut program = program(backend);
        assert!(program.load_warning().is_some());

        add(&mut program, "Coffee", "3.5");
        assert!(program.load_warning().is_none());
        assert_eq!(program.store().load().unwrap().len(), 1);
    }

    #[test]
    fn totals_follow_model() {
        let mut program = program(RecordingStore::default());
        add(&mut program, "Coffee", "3.5");
        program
            .dispatch(Msg::SetType(TransactionType::Income))
            .unwrap();
        add(&mut program, "Salary", "100");
        let totals = program.totals();
        assert!((totals.expenses - 3.5).abs() < f64::EPSILON);
        assert!((totals.income - 100.0).abs() < f64::EPSILON);
        assert!((totals.balance() - 96.5).abs() < f64::EPSILON);
    }
}
