//! Running totals derived from a transaction list.

use super::{Transaction, TransactionType};

/// Sums of income and expenses over a set of transactions.
///
/// Always computed from the full list; nothing here is cached in the model.
/// Amounts are added as plain `f64`, rounding is left to display code.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Sum of all income amounts.
    pub income: f64,
    /// Sum of all expense amounts.
    pub expenses: f64,
}

impl Totals {
    /// Computes the totals of `transactions`.
    #[inline]
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut totals, tx| {
                match tx.kind() {
                    TransactionType::Expense => totals.expenses += tx.amount(),
                    TransactionType::Income => totals.income += tx.amount(),
                }
                totals
            })
    }

    /// Income minus expenses.
    #[inline]
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}
