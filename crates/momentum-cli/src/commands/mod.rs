//! CLI subcommand implementations.

pub mod auth;
pub mod backup;
pub mod coach;
pub mod completions;
pub mod config;
pub mod finance;
pub mod habit;
pub mod onboard;
pub mod profile;
pub mod stats;
pub mod task;

use momentum_core::{StateDb, Tracker};

/// Open the state database and load the tracker.
pub fn open_tracker() -> Result<Tracker, Box<dyn std::error::Error>> {
    let db = StateDb::open()?;
    Tracker::load(Box::new(db))
}
