//! Coach chat commands for CLI.

use std::io::{BufRead, Write};

use clap::Subcommand;
use momentum_core::{ChatSession, CoachGateway, Config, GeminiCoach, OfflineCoach};

use super::open_tracker;

#[derive(Subcommand)]
pub enum CoachAction {
    /// Send one message and print the coach's reply
    Chat {
        /// Message text
        message: String,
    },
    /// Start an interactive chat session
    Session,
}

/// Build the configured gateway. When the key or configuration is
/// unusable the offline stand-in is returned, so coach features degrade
/// to their fixed fallback content instead of erroring out.
pub(crate) fn connect() -> Box<dyn CoachGateway> {
    let config = Config::load_or_default();
    match GeminiCoach::from_config(&config) {
        Ok(coach) => Box::new(coach),
        Err(e) => {
            eprintln!("Warning: coach gateway unavailable: {e}");
            Box::new(OfflineCoach)
        }
    }
}

pub fn run(action: CoachAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = open_tracker()?;
    let profile = tracker
        .user()
        .ok_or("no profile yet: run `onboard` first")?
        .clone();

    let gateway = connect();
    let mut session = ChatSession::new(&profile);
    let runtime = tokio::runtime::Runtime::new()?;

    match action {
        CoachAction::Chat { message } => {
            let reply = runtime
                .block_on(session.send(gateway.as_ref(), &message))
                .ok_or("message cannot be empty")?;
            println!("{}", reply.text);
        }
        CoachAction::Session => {
            if let Some(welcome) = session.messages().first() {
                println!("coach> {}", welcome.text);
            }
            println!("(type 'exit' to leave)");
            let stdin = std::io::stdin();
            loop {
                print!("you> ");
                std::io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }
                if let Some(reply) = runtime.block_on(session.send(gateway.as_ref(), line)) {
                    println!("coach> {}", reply.text);
                }
            }
        }
    }
    Ok(())
}
