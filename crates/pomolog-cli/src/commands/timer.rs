use clap::{Subcommand, ValueEnum};
use pomolog_core::notify::announce_completion;
use pomolog_core::{Clock, Event, Mode, SystemClock};

use crate::common::{print_json, AppState, TerminalBell, TerminalNotifier};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown (alias for start)
    Resume,
    /// Reset to idle; an unfinished activity leaves no trace
    Reset,
    /// Switch mode, abandoning the current activity
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Advance the countdown and print the current state as JSON
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Work,
    ShortBreak,
    LongBreak,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Work => Mode::Work,
            ModeArg::ShortBreak => Mode::ShortBreak,
            ModeArg::LongBreak => Mode::LongBreak,
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = AppState::load()?;
    let now = SystemClock.now();

    match action {
        TimerAction::Start | TimerAction::Resume => {
            match app.engine.start(&mut app.ledger, now) {
                Some(event) => print_json(&event)?,
                None => print_json(&app.engine.snapshot(now))?, // already running
            }
        }
        TimerAction::Pause => match app.engine.pause(&mut app.ledger, now) {
            Some(event) => print_json(&event)?,
            None => print_json(&app.engine.snapshot(now))?,
        },
        TimerAction::Reset => {
            let event = app.engine.reset(&mut app.ledger, now);
            print_json(&event)?;
        }
        TimerAction::Mode { mode } => {
            let event = app.engine.set_mode(&mut app.ledger, mode.into(), now);
            print_json(&event)?;
        }
        TimerAction::Status => {
            if let Some(event) = app.engine.tick(&mut app.ledger, now) {
                if let Event::TimerFinished { mode, .. } = event {
                    announce_completion(
                        app.engine.settings(),
                        mode,
                        &mut TerminalNotifier,
                        &mut TerminalBell,
                    );
                }
                print_json(&event)?;
            }
            print_json(&app.engine.snapshot(now))?;
        }
    }

    app.persist();
    Ok(())
}
