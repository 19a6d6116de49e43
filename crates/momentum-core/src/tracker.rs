//! Tracker state root and lifecycle operations.
//!
//! [`Tracker`] owns the whole application state (profile, tasks, habits,
//! gamification, finance ledger) and applies every mutation. XP is
//! awarded exactly once per incomplete-to-complete transition; reverting
//! a completion never deducts. After each effective mutation the full
//! state snapshot is handed to the [`StateStore`]; a failed write only
//! logs a warning, since mutation success is defined by the in-memory
//! state.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::coach::CoachGateway;
use crate::error::CoreError;
use crate::finance::{Ledger, Transaction, TransactionKind};
use crate::gamification::Gamification;
use crate::habit::{Frequency, Habit};
use crate::profile::UserProfile;
use crate::task::{Task, TaskCategory};

/// XP granted for a user-added task.
pub const TODO_TASK_XP: u32 = 20;
/// XP granted for each coach-planned starter task.
pub const PLAN_TASK_XP: u32 = 50;
/// XP granted for the offline fallback starter task.
pub const FALLBACK_TASK_XP: u32 = 10;
/// Title of the starter task used when plan generation fails.
pub const FALLBACK_TASK_TITLE: &str = "Drink water";

/// Persistence seam for the tracker state.
pub trait StateStore {
    /// Load the last persisted state.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read or a stored
    /// document cannot be decoded.
    fn load(&self) -> Result<AppState, Box<dyn std::error::Error>>;

    /// Persist a full state snapshot.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, state: &AppState) -> Result<(), Box<dyn std::error::Error>>;
}

/// The full per-user application state.
///
/// Persisted as one document per field (see the storage module); the
/// serde derives additionally back single-file backup snapshots, where
/// missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    /// Onboarded user, if any.
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// One-off tasks, newest first.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Recurring habits, newest first.
    #[serde(default)]
    pub habits: Vec<Habit>,
    /// XP record.
    #[serde(default)]
    pub game: Gamification,
    /// Finance ledger.
    #[serde(default)]
    pub ledger: Ledger,
}

impl AppState {
    /// Serialize the whole state as one pretty JSON document.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(CoreError::from)
    }

    /// Parse a snapshot produced by [`AppState::to_json`].
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON for this shape.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(CoreError::from)
    }

    /// Write the snapshot to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save_to_file(&self, path: &Path) -> Result<(), CoreError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(CoreError::from)?;
        Ok(())
    }

    /// Read a snapshot file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(CoreError::from)?;
        Self::from_json(&content)
    }
}

/// Result of a completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Completion state after the toggle.
    pub completed: bool,
    /// XP granted by this toggle; zero when reverting.
    pub xp_awarded: u32,
}

/// Where the starter plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    /// Titles supplied by the coach gateway.
    Coach,
    /// Deterministic offline fallback.
    Fallback,
}

/// Owns the state root and applies every mutation.
pub struct Tracker {
    state: AppState,
    store: Box<dyn StateStore>,
    plan_in_flight: bool,
}

impl Tracker {
    /// Load the persisted state from `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn load(store: Box<dyn StateStore>) -> Result<Self, Box<dyn std::error::Error>> {
        let state = store.load()?;
        Ok(Self {
            state,
            store,
            plan_in_flight: false,
        })
    }

    /// Wrap an existing state without reading the store.
    pub fn with_state(state: AppState, store: Box<dyn StateStore>) -> Self {
        Self {
            state,
            store,
            plan_in_flight: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn game(&self) -> &Gamification {
        &self.state.game
    }

    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    /// Whether a starter-plan request is currently outstanding.
    pub fn plan_in_flight(&self) -> bool {
        self.plan_in_flight
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.state) {
            eprintln!("Warning: failed to persist state: {e}");
        }
    }

    /// Finish onboarding: store the profile and seed the starter plan.
    ///
    /// Asks the coach gateway for starter task titles and replaces the
    /// task list with them (`xp_reward` 50 each, sequential `plan-N`
    /// ids). A gateway failure falls back to a single deterministic
    /// starter task instead of surfacing the error, so onboarding always
    /// completes. Returns `None` only when a previous plan request is
    /// still outstanding.
    pub async fn complete_onboarding(
        &mut self,
        gateway: &dyn CoachGateway,
        mut profile: UserProfile,
    ) -> Option<PlanSource> {
        if self.plan_in_flight {
            return None;
        }
        self.plan_in_flight = true;

        profile.onboarded = true;
        let plan = gateway.generate_plan(&profile).await;
        self.state.user = Some(profile);

        let source = match plan {
            Ok(titles) => {
                self.state.tasks = titles
                    .into_iter()
                    .enumerate()
                    .map(|(i, title)| {
                        Task::with_id(format!("plan-{i}"), title, PLAN_TASK_XP, TaskCategory::HabitSeed)
                    })
                    .collect();
                PlanSource::Coach
            }
            Err(_) => {
                self.state.tasks = vec![Task::with_id(
                    "plan-fallback",
                    FALLBACK_TASK_TITLE,
                    FALLBACK_TASK_XP,
                    TaskCategory::HabitSeed,
                )];
                PlanSource::Fallback
            }
        };

        self.plan_in_flight = false;
        self.persist();
        Some(source)
    }

    /// Add a user-authored task at the head of the list.
    ///
    /// An empty (after trim) title is rejected by returning `None` and
    /// leaving the list unchanged.
    pub fn add_task(&mut self, title: &str) -> Option<&Task> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let task = Task::new(title, TODO_TASK_XP, TaskCategory::Todo);
        self.state.tasks.insert(0, task);
        self.persist();
        self.state.tasks.first()
    }

    /// Flip a task's completion state. Missing ids are a no-op (`None`).
    ///
    /// XP is awarded only when the task becomes completed; toggling it
    /// back does not deduct.
    pub fn toggle_task(&mut self, id: &str) -> Option<ToggleOutcome> {
        let task = self.state.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let outcome = ToggleOutcome {
            completed: task.completed,
            xp_awarded: if task.completed { task.xp_reward } else { 0 },
        };
        if outcome.xp_awarded > 0 {
            self.state.game.award(outcome.xp_awarded);
        }
        self.persist();
        Some(outcome)
    }

    /// Remove a task. Missing ids are a no-op; returns whether a task
    /// was removed.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        let removed = self.state.tasks.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Add a habit at the head of the list, starting today.
    ///
    /// An empty (after trim) title is rejected by returning `None` and
    /// leaving the list unchanged.
    pub fn add_habit(
        &mut self,
        title: &str,
        frequency: Frequency,
        custom_days: BTreeSet<u8>,
        xp_reward: u32,
    ) -> Option<&Habit> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let habit = Habit::new(title, frequency, custom_days, xp_reward);
        self.state.habits.insert(0, habit);
        self.persist();
        self.state.habits.first()
    }

    /// Toggle today's completion for a habit. Missing ids are a no-op.
    pub fn toggle_habit(&mut self, id: &str) -> Option<ToggleOutcome> {
        self.toggle_habit_on(id, Local::now().date_naive())
    }

    /// Toggle a habit's completion for an explicit date.
    ///
    /// Scheduling is advisory: any date can be toggled regardless of the
    /// habit's frequency rule. XP is awarded only when the date is newly
    /// marked; unmarking does not deduct.
    pub fn toggle_habit_on(&mut self, id: &str, date: NaiveDate) -> Option<ToggleOutcome> {
        let habit = self.state.habits.iter_mut().find(|h| h.id == id)?;
        let outcome = if habit.is_completed_on(date) {
            habit.unmark_completed(date);
            ToggleOutcome {
                completed: false,
                xp_awarded: 0,
            }
        } else {
            habit.mark_completed(date);
            ToggleOutcome {
                completed: true,
                xp_awarded: habit.xp_reward,
            }
        };
        if outcome.xp_awarded > 0 {
            self.state.game.award(outcome.xp_awarded);
        }
        self.persist();
        Some(outcome)
    }

    /// Remove a habit. Missing ids are a no-op; XP already awarded for
    /// past completions is kept.
    pub fn delete_habit(&mut self, id: &str) -> bool {
        let before = self.state.habits.len();
        self.state.habits.retain(|h| h.id != id);
        let removed = self.state.habits.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Flip the premium flag. Returns false when no profile exists.
    pub fn set_premium(&mut self, premium: bool) -> bool {
        match self.state.user.as_mut() {
            Some(user) => {
                user.premium = premium;
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Record a ledger entry dated today. Invalid input (blank
    /// description, non-positive amount) is rejected by returning `None`.
    pub fn add_transaction(
        &mut self,
        amount: f64,
        description: &str,
        kind: TransactionKind,
    ) -> Option<&Transaction> {
        self.add_transaction_on(amount, description, kind, Local::now().date_naive())
    }

    /// Record a ledger entry for an explicit date.
    pub fn add_transaction_on(
        &mut self,
        amount: f64,
        description: &str,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Option<&Transaction> {
        self.state.ledger.add_on(amount, description, kind, date)?;
        self.persist();
        self.state.ledger.entries().first()
    }

    /// Remove a ledger entry. Missing ids are a no-op; returns whether
    /// an entry was removed.
    pub fn delete_transaction(&mut self, id: &str) -> bool {
        let removed = self.state.ledger.delete(id);
        if removed {
            self.persist();
        }
        removed
    }

    /// Wipe the whole state: profile, tasks, habits, XP and ledger.
    pub fn reset(&mut self) {
        self.state = AppState::default();
        self.persist();
    }

    /// Replace the whole state with a restored snapshot.
    pub fn restore(&mut self, state: AppState) {
        self.state = state;
        self.persist();
    }
}
