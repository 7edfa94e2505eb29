//! Shared plumbing for CLI commands: load persisted state, apply one
//! intent, persist back. Storage write failures are logged and swallowed
//! so a full disk never loses the in-memory state mid-command.

use std::io::Write;

use pomolog_core::storage::records;
use pomolog_core::{ActivityLedger, Database, Notifier, Permission, SoundPlayer, TimerEngine};

/// Everything a command needs: the store and the state loaded from it.
pub struct AppState {
    pub db: Database,
    pub ledger: ActivityLedger,
    pub engine: TimerEngine,
}

impl AppState {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open()?;
        let settings = records::load_settings(&db);
        let ledger = records::load_ledger(&db);
        let engine = records::load_timer(&db).unwrap_or_else(|| TimerEngine::new(settings));
        Ok(Self { db, ledger, engine })
    }

    /// Persist ledger and timer state after a mutation.
    pub fn persist(&mut self) {
        if let Err(e) = records::save_ledger(&mut self.db, &self.ledger) {
            log::warn!("could not persist activities: {e}");
        }
        if let Err(e) = records::save_timer(&mut self.db, &self.engine) {
            log::warn!("could not persist timer state: {e}");
        }
    }

    /// Persist the settings record (only changes at the commit boundary).
    pub fn persist_settings(&mut self) {
        if let Err(e) = records::save_settings(&mut self.db, self.engine.settings()) {
            log::warn!("could not persist settings: {e}");
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Terminal stand-in for the notification collaborator: a line on stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Terminal stand-in for the sound collaborator: the BEL character.
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play_cue(&mut self) {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}
