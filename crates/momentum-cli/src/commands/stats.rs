//! Progress overview command for CLI.

use chrono::Local;

use super::open_tracker;

#[derive(serde::Serialize)]
struct StatsView {
    xp: u32,
    level: u32,
    xp_into_level: u32,
    xp_to_next_level: u32,
    streak: u32,
    tasks_total: usize,
    tasks_completed: usize,
    habits_total: usize,
    habits_due_today: usize,
    habits_completed_today: usize,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let tracker = open_tracker()?;
    let today = Local::now().date_naive();
    let game = tracker.game();

    let view = StatsView {
        xp: game.xp(),
        level: game.level(),
        xp_into_level: game.xp_into_level(),
        xp_to_next_level: game.xp_to_next_level(),
        streak: game.streak(),
        tasks_total: tracker.tasks().len(),
        tasks_completed: tracker.tasks().iter().filter(|t| t.completed).count(),
        habits_total: tracker.habits().len(),
        habits_due_today: tracker
            .habits()
            .iter()
            .filter(|h| h.is_scheduled_on(today))
            .count(),
        habits_completed_today: tracker
            .habits()
            .iter()
            .filter(|h| h.is_completed_on(today))
            .count(),
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
