//! Personal finance ledger.
//!
//! Pure arithmetic over an ordered list of transactions. The ledger
//! never touches gamification.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A single ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: String,
    /// Positive amount
    pub amount: f64,
    /// Display text
    pub description: String,
    /// Income or expense
    pub kind: TransactionKind,
    /// Calendar date of the entry
    pub date: NaiveDate,
}

/// Ordered sequence of transactions, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<Transaction>,
}

impl Ledger {
    /// Add an entry for an explicit date.
    ///
    /// Rejects an empty (after trim) description or a non-positive or
    /// non-finite amount by returning `None` and leaving the ledger
    /// unchanged.
    pub fn add_on(
        &mut self,
        amount: f64,
        description: &str,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Option<&Transaction> {
        let description = description.trim();
        if description.is_empty() || !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        let entry = Transaction {
            id: format!("txn-{}-{}", Utc::now().timestamp(), uuid::Uuid::new_v4()),
            amount,
            description: description.to_string(),
            kind,
            date,
        };
        self.entries.insert(0, entry);
        self.entries.first()
    }

    /// Remove an entry. Missing ids are a no-op; returns whether an entry
    /// was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    /// Sum of income entries.
    pub fn income(&self) -> f64 {
        self.sum_kind(TransactionKind::Income)
    }

    /// Sum of expense entries.
    pub fn expenses(&self) -> f64 {
        self.sum_kind(TransactionKind::Expense)
    }

    /// Income minus expenses.
    pub fn balance(&self) -> f64 {
        self.income() - self.expenses()
    }

    fn sum_kind(&self, kind: TransactionKind) -> f64 {
        self.entries
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }
}
