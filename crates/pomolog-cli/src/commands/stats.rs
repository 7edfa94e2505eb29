use clap::Subcommand;
use pomolog_core::{daily_histogram, summarize, Clock, Dashboard, SystemClock};

use crate::common::{print_json, AppState};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Aggregate counters (pomodoros, sessions, minutes)
    Summary,
    /// Completed work intervals per calendar date
    Daily,
    /// Snapshot, summary, and histogram in one payload
    Dashboard,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = AppState::load()?;
    let cadence = app.engine.settings().sessions_before_long_break;

    match action {
        StatsAction::Summary => {
            print_json(&summarize(&app.ledger, cadence))?;
        }
        StatsAction::Daily => {
            print_json(&daily_histogram(&app.ledger))?;
        }
        StatsAction::Dashboard => {
            let dashboard = Dashboard {
                snapshot: app.engine.snapshot(SystemClock.now()),
                summary: summarize(&app.ledger, cadence),
                daily: daily_histogram(&app.ledger),
            };
            print_json(&dashboard)?;
        }
    }
    Ok(())
}
