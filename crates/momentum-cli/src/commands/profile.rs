//! Profile commands for CLI.

use clap::Subcommand;
use momentum_core::UserProfile;

use super::open_tracker;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile with progress numbers
    Show,
    /// Turn the premium subscription flag on or off
    Premium {
        /// "on" or "off"
        state: String,
    },
    /// Wipe all local data and start over
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(serde::Serialize)]
struct ProfileView<'a> {
    #[serde(flatten)]
    profile: &'a UserProfile,
    xp: u32,
    level: u32,
    xp_to_next_level: u32,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        ProfileAction::Show => {
            let profile = tracker
                .user()
                .ok_or("no profile yet: run `onboard` first")?;
            let game = tracker.game();
            let view = ProfileView {
                profile,
                xp: game.xp(),
                level: game.level(),
                xp_to_next_level: game.xp_to_next_level(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        ProfileAction::Premium { state } => {
            let premium = match state.to_ascii_lowercase().as_str() {
                "on" => true,
                "off" => false,
                other => return Err(format!("invalid state '{other}' (expected on or off)").into()),
            };
            if !tracker.set_premium(premium) {
                return Err("no profile yet: run `onboard` first".into());
            }
            println!("Premium {}", if premium { "enabled" } else { "disabled" });
        }
        ProfileAction::Reset { yes } => {
            if !yes {
                return Err("this wipes all local data; pass --yes to confirm".into());
            }
            tracker.reset();
            println!("All data cleared");
        }
    }
    Ok(())
}
