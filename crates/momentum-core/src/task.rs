//! One-off task items.
//!
//! Tasks carry a fixed XP reward decided at creation; completion is the
//! only mutable field afterwards. Toggling and the XP award rules live in
//! the [`crate::tracker`] module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a task came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    /// Seeded by the AI coach's initial plan.
    HabitSeed,
    /// Added by the user.
    Todo,
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::Todo
    }
}

/// A one-off actionable item with a binary completion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Display text
    pub title: String,
    /// Whether the task is completed
    pub completed: bool,
    /// XP granted when the task transitions to completed, fixed at creation
    pub xp_reward: u32,
    /// Category tag, informational only
    #[serde(default)]
    pub category: TaskCategory,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new incomplete task with a generated id.
    pub fn new(title: impl Into<String>, xp_reward: u32, category: TaskCategory) -> Self {
        let now = Utc::now();
        Task {
            id: format!("task-{}-{}", now.timestamp(), uuid::Uuid::new_v4()),
            title: title.into(),
            completed: false,
            xp_reward,
            category,
            created_at: now,
        }
    }

    /// Create a task with a caller-supplied id (plan seeding uses
    /// sequential synthetic ids).
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        xp_reward: u32,
        category: TaskCategory,
    ) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            completed: false,
            xp_reward,
            category,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_starts_incomplete() {
        let t = Task::new("Read 10 pages", 20, TaskCategory::Todo);
        assert!(!t.completed);
        assert_eq!(t.xp_reward, 20);
        assert_eq!(t.category, TaskCategory::Todo);
        assert!(t.id.starts_with("task-"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Task::new("a", 20, TaskCategory::Todo);
        let b = Task::new("b", 20, TaskCategory::Todo);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn with_id_keeps_caller_id() {
        let t = Task::with_id("plan-0", "Meditate 5 min", 50, TaskCategory::HabitSeed);
        assert_eq!(t.id, "plan-0");
        assert_eq!(t.xp_reward, 50);
        assert_eq!(t.category, TaskCategory::HabitSeed);
    }

    #[test]
    fn category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskCategory::HabitSeed).unwrap(),
            "\"habit-seed\""
        );
        assert_eq!(serde_json::to_string(&TaskCategory::Todo).unwrap(), "\"todo\"");
    }

    #[test]
    fn task_roundtrip_preserves_fields() {
        let t = Task::new("Stretch", 30, TaskCategory::Todo);
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, t.id);
        assert_eq!(back.title, "Stretch");
        assert_eq!(back.xp_reward, 30);
        assert!(!back.completed);
    }
}
