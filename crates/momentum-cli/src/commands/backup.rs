//! Whole-state backup export and import.

use std::path::PathBuf;

use clap::Subcommand;
use momentum_core::storage::data_dir;
use momentum_core::AppState;

use super::open_tracker;

#[derive(Subcommand)]
pub enum BackupAction {
    /// Write the full state to a JSON file
    Export {
        /// Output file path (default: momentum-backup.json in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace the full state with a snapshot file
    Import {
        /// Backup file to read
        path: PathBuf,
    },
}

pub fn run(action: BackupAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BackupAction::Export { output } => {
            let tracker = open_tracker()?;
            let path = match output {
                Some(path) => path,
                None => data_dir()?.join("momentum-backup.json"),
            };
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            tracker.state().save_to_file(&path)?;
            println!("Backup exported to: {}", path.display());
        }
        BackupAction::Import { path } => {
            let snapshot = AppState::load_from_file(&path)?;
            let mut tracker = open_tracker()?;
            tracker.restore(snapshot);
            let state = tracker.state();
            println!(
                "Backup imported: {} tasks, {} habits, {} transactions",
                state.tasks.len(),
                state.habits.len(),
                state.ledger.entries().len()
            );
        }
    }
    Ok(())
}
