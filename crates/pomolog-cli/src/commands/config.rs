use clap::Subcommand;
use pomolog_core::{Clock, Settings, SystemClock};

use crate::common::{print_json, AppState};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "workMinutes", "autoStart")
        key: String,
    },
    /// Set a settings value; commits and resets the timer
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings values
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = AppState::load()?;
    let now = SystemClock.now();

    match action {
        ConfigAction::Get { key } => {
            match app.engine.settings().get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut draft = app.engine.settings().clone();
            draft.set(&key, &value)?;
            app.engine.commit_settings(&mut app.ledger, draft, now)?;
            app.persist_settings();
            app.persist();
            println!("ok");
        }
        ConfigAction::List => {
            print_json(app.engine.settings())?;
        }
        ConfigAction::Reset => {
            app.engine
                .commit_settings(&mut app.ledger, Settings::default(), now)?;
            app.persist_settings();
            app.persist();
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
