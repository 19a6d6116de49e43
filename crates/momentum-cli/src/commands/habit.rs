//! Habit management commands for CLI.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use momentum_core::{Frequency, Habit, Tracker};

use super::open_tracker;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a new habit
    Add {
        /// Habit title
        title: String,
        /// Recurrence: daily, weekly or custom
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Comma-separated weekday indices for custom recurrence (0=Sunday .. 6=Saturday)
        #[arg(long)]
        days: Option<String>,
        /// XP granted per completed day
        #[arg(long, default_value = "30")]
        xp: u32,
    },
    /// List habits with their schedule and completion state for a date
    List {
        /// Date to evaluate against (YYYY-MM-DD, today by default)
        #[arg(long)]
        date: Option<String>,
    },
    /// Toggle completion for a date (XP is awarded when a date is newly marked)
    Toggle {
        /// Habit id, or 1-based position from `habit list`
        id: String,
        /// Date to toggle (YYYY-MM-DD, today by default)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a habit
    Delete {
        /// Habit id, or 1-based position from `habit list`
        id: String,
    },
}

/// One habit plus its recurrence evaluation for the requested date.
#[derive(serde::Serialize)]
struct HabitRow<'a> {
    #[serde(flatten)]
    habit: &'a Habit,
    scheduled: bool,
    completed: bool,
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        HabitAction::Add {
            title,
            frequency,
            days,
            xp,
        } => {
            let frequency = parse_frequency(&frequency)?;
            let custom_days = parse_days(days.as_deref())?;
            match tracker.add_habit(&title, frequency, custom_days, xp) {
                Some(habit) => {
                    println!("Habit created: {}", habit.id);
                    println!("{}", serde_json::to_string_pretty(habit)?);
                }
                None => return Err("habit title cannot be empty".into()),
            }
        }
        HabitAction::List { date } => {
            let date = parse_date(date.as_deref())?;
            let rows: Vec<HabitRow> = tracker
                .habits()
                .iter()
                .map(|habit| HabitRow {
                    habit,
                    scheduled: habit.is_scheduled_on(date),
                    completed: habit.is_completed_on(date),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        HabitAction::Toggle { id, date } => {
            let id = resolve_id(&tracker, &id).ok_or(format!("Habit not found: {id}"))?;
            let date = parse_date(date.as_deref())?;
            let outcome = tracker
                .toggle_habit_on(&id, date)
                .ok_or(format!("Habit not found: {id}"))?;
            if outcome.completed {
                println!(
                    "Habit completed for {date}: +{} XP (total {}, level {})",
                    outcome.xp_awarded,
                    tracker.game().xp(),
                    tracker.game().level()
                );
            } else {
                println!("Habit unmarked for {date} (XP kept)");
            }
        }
        HabitAction::Delete { id } => {
            let id = resolve_id(&tracker, &id).ok_or(format!("Habit not found: {id}"))?;
            tracker.delete_habit(&id);
            println!("Habit deleted: {id}");
        }
    }
    Ok(())
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match raw {
        Some(raw) => Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_frequency(s: &str) -> Result<Frequency, Box<dyn std::error::Error>> {
    match s.to_ascii_lowercase().as_str() {
        "daily" => Ok(Frequency::Daily),
        "weekly" => Ok(Frequency::Weekly),
        "custom" => Ok(Frequency::Custom),
        other => Err(format!("invalid frequency '{other}' (expected daily, weekly or custom)").into()),
    }
}

fn parse_days(raw: Option<&str>) -> Result<BTreeSet<u8>, Box<dyn std::error::Error>> {
    let mut days = BTreeSet::new();
    let Some(raw) = raw else {
        return Ok(days);
    };
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let day: u8 = part
            .parse()
            .map_err(|_| format!("invalid weekday index '{part}'"))?;
        if day > 6 {
            return Err(format!("weekday index {day} out of range (0=Sunday .. 6=Saturday)").into());
        }
        days.insert(day);
    }
    Ok(days)
}

/// Accept either a full habit id or a 1-based position from `habit list`.
fn resolve_id(tracker: &Tracker, key: &str) -> Option<String> {
    if let Ok(n) = key.parse::<usize>() {
        if n >= 1 && n <= tracker.habits().len() {
            return Some(tracker.habits()[n - 1].id.clone());
        }
    }
    tracker
        .habits()
        .iter()
        .find(|h| h.id == key)
        .map(|h| h.id.clone())
}
