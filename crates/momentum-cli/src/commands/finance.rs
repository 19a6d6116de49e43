//! Finance ledger commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use momentum_core::{Tracker, TransactionKind};

use super::open_tracker;

#[derive(Subcommand)]
pub enum FinanceAction {
    /// Record a transaction
    Add {
        /// What the money was for
        description: String,
        /// Amount (positive)
        #[arg(long)]
        amount: f64,
        /// Transaction kind: income or expense
        #[arg(long, default_value = "expense")]
        kind: String,
        /// Transaction date (YYYY-MM-DD, today by default)
        #[arg(long)]
        date: Option<String>,
    },
    /// List ledger entries, newest first
    List,
    /// Delete a ledger entry
    Delete {
        /// Transaction id, or 1-based position from `finance list`
        id: String,
    },
    /// Print income, expense and balance totals
    Summary,
}

#[derive(serde::Serialize)]
struct SummaryView {
    income: f64,
    expenses: f64,
    balance: f64,
}

pub fn run(action: FinanceAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        FinanceAction::Add {
            description,
            amount,
            kind,
            date,
        } => {
            let kind = parse_kind(&kind)?;
            let entry = match date {
                Some(raw) => {
                    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?;
                    tracker.add_transaction_on(amount, &description, kind, date)
                }
                None => tracker.add_transaction(amount, &description, kind),
            };
            match entry {
                Some(tx) => {
                    println!("Transaction recorded: {}", tx.id);
                    println!("{}", serde_json::to_string_pretty(tx)?);
                }
                None => {
                    return Err(
                        "invalid transaction (description required, amount must be positive)"
                            .into(),
                    )
                }
            }
        }
        FinanceAction::List => {
            println!("{}", serde_json::to_string_pretty(tracker.ledger().entries())?);
        }
        FinanceAction::Delete { id } => {
            let id = resolve_id(&tracker, &id).ok_or(format!("Transaction not found: {id}"))?;
            tracker.delete_transaction(&id);
            println!("Transaction deleted: {id}");
        }
        FinanceAction::Summary => {
            let ledger = tracker.ledger();
            let view = SummaryView {
                income: ledger.income(),
                expenses: ledger.expenses(),
                balance: ledger.balance(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<TransactionKind, Box<dyn std::error::Error>> {
    match s.to_ascii_lowercase().as_str() {
        "income" => Ok(TransactionKind::Income),
        "expense" => Ok(TransactionKind::Expense),
        other => Err(format!("invalid kind '{other}' (expected income or expense)").into()),
    }
}

/// Accept either a full transaction id or a 1-based position from
/// `finance list`.
fn resolve_id(tracker: &Tracker, key: &str) -> Option<String> {
    let entries = tracker.ledger().entries();
    if let Ok(n) = key.parse::<usize>() {
        if n >= 1 && n <= entries.len() {
            return Some(entries[n - 1].id.clone());
        }
    }
    entries.iter().find(|t| t.id == key).map(|t| t.id.clone())
}
