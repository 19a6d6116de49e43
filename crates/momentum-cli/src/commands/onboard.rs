//! Onboarding command: create the profile and seed the starter plan.

use clap::Args;
use momentum_core::{FocusArea, PlanSource, UserProfile};

use super::{coach, open_tracker};

#[derive(Args)]
pub struct OnboardArgs {
    /// Your name
    #[arg(long)]
    name: String,
    /// Focus area: career, health, studies, finance or general
    #[arg(long, default_value = "general")]
    focus: String,
    /// Self-assessed discipline, 1 (low) to 10 (high)
    #[arg(long, default_value = "5")]
    discipline: u8,
    /// Minutes per day you can commit
    #[arg(long, default_value = "30")]
    minutes: u32,
    /// Replace an existing profile
    #[arg(long)]
    force: bool,
}

pub fn run(args: OnboardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;
    if tracker.user().is_some() && !args.force {
        return Err("a profile already exists (use --force to start over)".into());
    }

    let focus = parse_focus(&args.focus)?;
    let profile = UserProfile::new(&args.name, focus, args.discipline, args.minutes);

    let gateway = coach::connect();
    let runtime = tokio::runtime::Runtime::new()?;
    let source = runtime
        .block_on(tracker.complete_onboarding(gateway.as_ref(), profile))
        .ok_or("a starter plan request is already running")?;

    match source {
        PlanSource::Coach => println!("Welcome, {}! Your starter plan is ready:", args.name),
        PlanSource::Fallback => println!(
            "Welcome, {}! The coach is offline, starting simple:",
            args.name
        ),
    }
    for (i, task) in tracker.tasks().iter().enumerate() {
        println!("  {}. {} (+{} XP)", i + 1, task.title, task.xp_reward);
    }
    Ok(())
}

fn parse_focus(s: &str) -> Result<FocusArea, Box<dyn std::error::Error>> {
    match s.to_ascii_lowercase().as_str() {
        "career" => Ok(FocusArea::Career),
        "health" => Ok(FocusArea::Health),
        "studies" => Ok(FocusArea::Studies),
        "finance" => Ok(FocusArea::Finance),
        "general" => Ok(FocusArea::General),
        other => Err(format!(
            "invalid focus area '{other}' (expected career, health, studies, finance or general)"
        )
        .into()),
    }
}
