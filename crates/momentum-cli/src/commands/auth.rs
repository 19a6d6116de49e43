//! Credential commands: the Gemini API key in the OS keyring.

use std::io::BufRead;

use clap::Subcommand;
use momentum_core::coach::{gemini::API_KEY_NAME, keyring_store};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the Gemini API key
    SetKey {
        /// The key; read from stdin when omitted
        #[arg(long)]
        key: Option<String>,
    },
    /// Remove the stored key
    Clear,
    /// Check whether a key is stored
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetKey { key } => {
            let key = match key {
                Some(key) => key,
                None => {
                    let mut line = String::new();
                    std::io::stdin().lock().read_line(&mut line)?;
                    line.trim().to_string()
                }
            };
            if key.is_empty() {
                return Err("API key cannot be empty".into());
            }
            keyring_store::set(API_KEY_NAME, &key)?;
            println!("Gemini API key stored");
        }
        AuthAction::Clear => {
            keyring_store::delete(API_KEY_NAME)?;
            println!("Gemini API key removed");
        }
        AuthAction::Status => {
            let status = match keyring_store::get(API_KEY_NAME)? {
                Some(_) => "configured",
                None => "not configured",
            };
            println!("{status}");
        }
    }
    Ok(())
}
