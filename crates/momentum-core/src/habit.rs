//! Recurring habits and the calendar recurrence evaluator.
//!
//! A habit carries a frequency rule (daily, weekly, or a custom weekday
//! set) and the set of calendar dates on which it was marked complete.
//! Scheduling is advisory: it drives display emphasis, never whether a
//! toggle is allowed.

use std::collections::BTreeSet;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Recurrence rule for a habit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Scheduled every day.
    Daily,
    /// Scheduled once a week, on the weekday the habit was created.
    Weekly,
    /// Scheduled on an explicit set of weekdays.
    Custom,
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Daily
    }
}

/// Weekday index of a date, 0=Sun ... 6=Sat.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// A recurring actionable item evaluated against calendar dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: String,
    /// Display text
    pub title: String,
    /// Recurrence rule
    pub frequency: Frequency,
    /// Weekday indices (0=Sun ... 6=Sat), used only when frequency is custom
    #[serde(default)]
    pub custom_days: BTreeSet<u8>,
    /// Every date on which the habit was marked complete
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    /// XP granted per newly completed date, fixed at creation
    pub xp_reward: u32,
    /// Creation date; anchors weekly recurrence
    pub created_on: NaiveDate,
}

impl Habit {
    /// Create a habit starting today (local time).
    pub fn new(
        title: impl Into<String>,
        frequency: Frequency,
        custom_days: BTreeSet<u8>,
        xp_reward: u32,
    ) -> Self {
        Self::with_start(
            title,
            frequency,
            custom_days,
            xp_reward,
            Local::now().date_naive(),
        )
    }

    /// Create a habit anchored to an explicit start date.
    pub fn with_start(
        title: impl Into<String>,
        frequency: Frequency,
        custom_days: BTreeSet<u8>,
        xp_reward: u32,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            id: format!(
                "habit-{}-{}",
                created_on.format("%Y%m%d"),
                uuid::Uuid::new_v4()
            ),
            title: title.into(),
            frequency,
            custom_days,
            completed_dates: BTreeSet::new(),
            xp_reward,
            created_on,
        }
    }

    /// Whether `date` is a scheduled day under the habit's frequency rule.
    ///
    /// Weekly habits are scheduled on the weekday of `created_on`. A custom
    /// habit with an empty weekday set is never scheduled.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => date.weekday() == self.created_on.weekday(),
            Frequency::Custom => self.custom_days.contains(&weekday_index(date)),
        }
    }

    /// Whether the habit was marked complete on `date`.
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Record a completion for `date`. Returns true if the date was newly
    /// added; re-marking an already-completed date is idempotent.
    pub fn mark_completed(&mut self, date: NaiveDate) -> bool {
        self.completed_dates.insert(date)
    }

    /// Remove a completion for `date`. Returns true if the date was
    /// present; unmarking an uncompleted date is idempotent.
    pub fn unmark_completed(&mut self, date: NaiveDate) -> bool {
        self.completed_dates.remove(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_is_scheduled_every_day() {
        let h = Habit::with_start("Meditate", Frequency::Daily, BTreeSet::new(), 30, date(2026, 8, 17));
        for offset in 0..14 {
            assert!(h.is_scheduled_on(date(2026, 8, 17) + chrono::Days::new(offset)));
        }
    }

    #[test]
    fn weekly_is_scheduled_on_creation_weekday_only() {
        // 2026-08-17 is a Monday.
        let h = Habit::with_start("Review week", Frequency::Weekly, BTreeSet::new(), 30, date(2026, 8, 17));
        assert!(h.is_scheduled_on(date(2026, 8, 17)));
        assert!(h.is_scheduled_on(date(2026, 8, 24)));
        assert!(h.is_scheduled_on(date(2026, 8, 31)));
        for offset in 1..7 {
            assert!(!h.is_scheduled_on(date(2026, 8, 17) + chrono::Days::new(offset)));
        }
    }

    #[test]
    fn custom_follows_weekday_set() {
        // 0=Sun, 3=Wed, 6=Sat
        let days: BTreeSet<u8> = [0, 3, 6].into_iter().collect();
        let h = Habit::with_start("Gym", Frequency::Custom, days, 30, date(2026, 8, 17));
        assert!(!h.is_scheduled_on(date(2026, 8, 17))); // Mon
        assert!(h.is_scheduled_on(date(2026, 8, 19))); // Wed
        assert!(h.is_scheduled_on(date(2026, 8, 22))); // Sat
        assert!(h.is_scheduled_on(date(2026, 8, 23))); // Sun
    }

    #[test]
    fn custom_with_empty_set_is_never_scheduled() {
        let h = Habit::with_start("Orphan", Frequency::Custom, BTreeSet::new(), 30, date(2026, 8, 17));
        for offset in 0..7 {
            assert!(!h.is_scheduled_on(date(2026, 8, 17) + chrono::Days::new(offset)));
        }
    }

    #[test]
    fn weekday_index_uses_sunday_zero() {
        assert_eq!(weekday_index(date(2026, 8, 23)), 0); // Sunday
        assert_eq!(weekday_index(date(2026, 8, 17)), 1); // Monday
        assert_eq!(weekday_index(date(2026, 8, 22)), 6); // Saturday
    }

    #[test]
    fn mark_and_unmark_are_idempotent() {
        let mut h = Habit::with_start("Water", Frequency::Daily, BTreeSet::new(), 10, date(2026, 8, 17));
        let today = date(2026, 8, 18);

        assert!(h.mark_completed(today));
        assert!(!h.mark_completed(today));
        assert_eq!(h.completed_dates.len(), 1);

        assert!(h.unmark_completed(today));
        assert!(!h.unmark_completed(today));
        assert!(h.completed_dates.is_empty());
    }

    #[test]
    fn completion_check_is_pure_membership() {
        let mut h = Habit::with_start("Walk", Frequency::Daily, BTreeSet::new(), 10, date(2026, 8, 17));
        h.mark_completed(date(2026, 8, 18));
        assert!(h.is_completed_on(date(2026, 8, 18)));
        assert!(!h.is_completed_on(date(2026, 8, 19)));
    }

    #[test]
    fn habit_roundtrip_preserves_dates_as_iso_strings() {
        let mut h = Habit::with_start(
            "Sleep early",
            Frequency::Custom,
            [1, 5].into_iter().collect(),
            30,
            date(2026, 8, 17),
        );
        h.mark_completed(date(2026, 8, 18));
        h.mark_completed(date(2026, 8, 20));

        let json = serde_json::to_string(&h).unwrap();
        assert!(json.contains("\"2026-08-18\""));
        assert!(json.contains("\"2026-08-20\""));

        let back: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.completed_dates, h.completed_dates);
        assert_eq!(back.custom_days, h.custom_days);
        assert_eq!(back.created_on, h.created_on);
    }

    proptest! {
        #[test]
        fn completed_dates_never_hold_duplicates(toggles in proptest::collection::vec(0u64..14, 0..60)) {
            let base = date(2026, 8, 17);
            let mut h = Habit::with_start("p", Frequency::Daily, BTreeSet::new(), 10, base);
            for offset in toggles {
                let day = base + chrono::Days::new(offset);
                if h.is_completed_on(day) {
                    h.unmark_completed(day);
                } else {
                    h.mark_completed(day);
                }
                let seen: Vec<_> = h.completed_dates.iter().collect();
                let mut dedup = seen.clone();
                dedup.dedup();
                prop_assert_eq!(seen.len(), dedup.len());
            }
        }

        #[test]
        fn weekly_schedule_repeats_every_seven_days(start_offset in 0u64..366, week in 0u64..52) {
            let created = date(2025, 1, 1) + chrono::Days::new(start_offset);
            let h = Habit::with_start("w", Frequency::Weekly, BTreeSet::new(), 10, created);
            prop_assert!(h.is_scheduled_on(created + chrono::Days::new(week * 7)));
        }
    }
}
