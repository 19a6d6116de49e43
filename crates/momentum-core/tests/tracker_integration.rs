//! Integration tests for the tracker lifecycle and SQLite persistence.
//!
//! These tests drive the complete workflow of onboarding, task and
//! habit mutations, and XP accrual through a real [`StateDb`] on disk,
//! reopening the database to verify what actually persisted.

use std::collections::BTreeSet;

use async_trait::async_trait;
use momentum_core::coach::{ChatMessage, CoachGateway};
use momentum_core::error::CoachError;
use momentum_core::finance::TransactionKind;
use momentum_core::habit::Frequency;
use momentum_core::profile::{FocusArea, UserProfile};
use momentum_core::storage::StateDb;
use momentum_core::tracker::{
    AppState, PlanSource, Tracker, FALLBACK_TASK_TITLE, FALLBACK_TASK_XP, PLAN_TASK_XP,
};

/// Gateway stub with a canned plan outcome.
struct StubCoach {
    titles: Option<Vec<&'static str>>,
}

#[async_trait]
impl CoachGateway for StubCoach {
    async fn generate_plan(&self, _profile: &UserProfile) -> Result<Vec<String>, CoachError> {
        match &self.titles {
            Some(titles) => Ok(titles.iter().map(|t| t.to_string()).collect()),
            None => Err(CoachError::Api {
                status: 503,
                message: "unavailable".to_string(),
            }),
        }
    }

    async fn chat_reply(
        &self,
        _history: &[ChatMessage],
        _message: &str,
        _profile: &UserProfile,
    ) -> Result<String, CoachError> {
        Ok("ok".to_string())
    }
}

fn test_profile() -> UserProfile {
    UserProfile::new("Marina", FocusArea::Studies, 6, 45)
}

#[tokio::test]
async fn test_onboarding_success_persists_plan_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    let db = StateDb::open_at(&path).unwrap();
    let mut tracker = Tracker::load(Box::new(db)).unwrap();

    let coach = StubCoach {
        titles: Some(vec!["Drink water", "Read 5 min", "Walk 10 min"]),
    };
    let source = tracker
        .complete_onboarding(&coach, test_profile())
        .await
        .unwrap();
    assert_eq!(source, PlanSource::Coach);

    // Reopen the database and verify the snapshot.
    let reopened = StateDb::open_at(&path).unwrap();
    let state = reopened.load_state().unwrap();
    assert_eq!(state.user.as_ref().unwrap().name, "Marina");
    assert!(state.user.as_ref().unwrap().onboarded);
    assert_eq!(state.tasks.len(), 3);
    assert_eq!(state.tasks[0].id, "plan-0");
    assert!(state.tasks.iter().all(|t| t.xp_reward == PLAN_TASK_XP));
}

#[tokio::test]
async fn test_onboarding_fallback_persists_single_starter_task() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    let db = StateDb::open_at(&path).unwrap();
    let mut tracker = Tracker::load(Box::new(db)).unwrap();

    let source = tracker
        .complete_onboarding(&StubCoach { titles: None }, test_profile())
        .await
        .unwrap();
    assert_eq!(source, PlanSource::Fallback);

    let reopened = StateDb::open_at(&path).unwrap();
    let state = reopened.load_state().unwrap();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].title, FALLBACK_TASK_TITLE);
    assert_eq!(state.tasks[0].xp_reward, FALLBACK_TASK_XP);
    // The gateway failure never blocks onboarding.
    assert!(state.user.as_ref().unwrap().onboarded);
}

#[test]
fn test_mutations_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    let task_id;
    let habit_id;
    {
        let db = StateDb::open_at(&path).unwrap();
        let mut tracker = Tracker::load(Box::new(db)).unwrap();

        task_id = tracker.add_task("Write journal").unwrap().id.clone();
        habit_id = tracker
            .add_habit("Meditate", Frequency::Daily, BTreeSet::new(), 30)
            .unwrap()
            .id
            .clone();
        tracker.toggle_task(&task_id).unwrap();
        tracker.toggle_habit(&habit_id).unwrap();
        assert_eq!(tracker.game().xp(), 50);
    }

    let db = StateDb::open_at(&path).unwrap();
    let tracker = Tracker::load(Box::new(db)).unwrap();
    assert_eq!(tracker.tasks().len(), 1);
    assert_eq!(tracker.tasks()[0].id, task_id);
    assert!(tracker.tasks()[0].completed);
    assert_eq!(tracker.habits().len(), 1);
    assert_eq!(tracker.habits()[0].completed_dates.len(), 1);
    assert_eq!(tracker.game().xp(), 50);
}

#[test]
fn test_completing_plan_task_crosses_level_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    // Seed the stored documents directly in the persisted wire format.
    let db = StateDb::open_at(&path).unwrap();
    db.kv_set("gamification", r#"{"xp":980,"streak":0,"last_login":null}"#)
        .unwrap();
    db.kv_set(
        "tasks",
        r#"[{
            "id": "plan-0",
            "title": "Morning run",
            "completed": false,
            "xp_reward": 50,
            "category": "habit-seed",
            "created_at": "2026-08-01T08:00:00Z"
        }]"#,
    )
    .unwrap();

    let mut tracker = Tracker::load(Box::new(db)).unwrap();
    assert_eq!(tracker.game().xp(), 980);
    assert_eq!(tracker.game().level(), 1);

    let outcome = tracker.toggle_task("plan-0").unwrap();
    assert_eq!(outcome.xp_awarded, 50);
    assert_eq!(tracker.game().xp(), 1030);
    assert_eq!(tracker.game().level(), 2);

    let reopened = StateDb::open_at(&path).unwrap();
    assert_eq!(reopened.load_state().unwrap().game.xp(), 1030);
}

#[test]
fn test_habit_deletion_preserves_xp_across_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    {
        let db = StateDb::open_at(&path).unwrap();
        let mut tracker = Tracker::load(Box::new(db)).unwrap();
        let id = tracker
            .add_habit("Stretch", Frequency::Daily, BTreeSet::new(), 25)
            .unwrap()
            .id
            .clone();
        tracker.toggle_habit(&id).unwrap();
        assert!(tracker.delete_habit(&id));
    }

    let db = StateDb::open_at(&path).unwrap();
    let tracker = Tracker::load(Box::new(db)).unwrap();
    assert!(tracker.habits().is_empty());
    assert_eq!(tracker.game().xp(), 25);
}

#[test]
fn test_reset_clears_persisted_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    {
        let db = StateDb::open_at(&path).unwrap();
        let mut tracker = Tracker::load(Box::new(db)).unwrap();
        tracker.add_task("Soon gone").unwrap();
        tracker.reset();
    }

    let db = StateDb::open_at(&path).unwrap();
    let state = db.load_state().unwrap();
    assert!(state.user.is_none());
    assert!(state.tasks.is_empty());
    assert_eq!(state.game.xp(), 0);
}

#[test]
fn test_corrupt_document_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    let db = StateDb::open_at(&path).unwrap();
    db.kv_set("habits", "{ not json").unwrap();

    assert!(Tracker::load(Box::new(db)).is_err());
}

#[test]
fn test_snapshot_file_restores_full_state() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("momentum.db");
    let backup = dir.path().join("backup.json");

    {
        let db = StateDb::open_at(&db_path).unwrap();
        let mut tracker = Tracker::load(Box::new(db)).unwrap();
        tracker.add_task("Pack bags").unwrap();
        tracker
            .add_transaction(120.0, "groceries", TransactionKind::Expense)
            .unwrap();
        tracker.state().save_to_file(&backup).unwrap();
        tracker.reset();
        assert!(tracker.tasks().is_empty());
    }

    let snapshot = AppState::load_from_file(&backup).unwrap();
    let db = StateDb::open_at(&db_path).unwrap();
    let mut tracker = Tracker::load(Box::new(db)).unwrap();
    tracker.restore(snapshot);

    let reopened = StateDb::open_at(&db_path).unwrap();
    let state = reopened.load_state().unwrap();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].title, "Pack bags");
    assert_eq!(state.ledger.entries().len(), 1);
}
