//! Task management commands for CLI.

use clap::Subcommand;
use momentum_core::Tracker;

use super::open_tracker;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task title
        title: String,
    },
    /// List tasks
    List,
    /// Toggle completion (XP is awarded when a task becomes completed)
    Toggle {
        /// Task id, or 1-based position from `task list`
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task id, or 1-based position from `task list`
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        TaskAction::Add { title } => match tracker.add_task(&title) {
            Some(task) => {
                println!("Task created: {}", task.id);
                println!("{}", serde_json::to_string_pretty(task)?);
            }
            None => return Err("task title cannot be empty".into()),
        },
        TaskAction::List => {
            println!("{}", serde_json::to_string_pretty(tracker.tasks())?);
        }
        TaskAction::Toggle { id } => {
            let id = resolve_id(&tracker, &id).ok_or(format!("Task not found: {id}"))?;
            let outcome = tracker.toggle_task(&id).ok_or(format!("Task not found: {id}"))?;
            if outcome.completed {
                println!(
                    "Task completed: +{} XP (total {}, level {})",
                    outcome.xp_awarded,
                    tracker.game().xp(),
                    tracker.game().level()
                );
            } else {
                println!("Task reopened (XP kept)");
            }
        }
        TaskAction::Delete { id } => {
            let id = resolve_id(&tracker, &id).ok_or(format!("Task not found: {id}"))?;
            tracker.delete_task(&id);
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}

/// Accept either a full task id or a 1-based position from `task list`.
fn resolve_id(tracker: &Tracker, key: &str) -> Option<String> {
    if let Ok(n) = key.parse::<usize>() {
        if n >= 1 && n <= tracker.tasks().len() {
            return Some(tracker.tasks()[n - 1].id.clone());
        }
    }
    tracker
        .tasks()
        .iter()
        .find(|t| t.id == key)
        .map(|t| t.id.clone())
}
