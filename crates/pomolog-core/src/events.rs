use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Mode;
use crate::timer::TimerState;

/// Every state change in the engine produces an Event.
/// The presentation layer prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// Manual mode override; the abandoned activity kept only the time it
    /// actually ran.
    ModeChanged {
        from: Mode,
        to: Mode,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero and the activity was finalized as
    /// completed.
    TimerFinished {
        mode: Mode,
        next_mode: Mode,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    SettingsCommitted {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        state: TimerState,
        title: String,
        /// Remaining time formatted as MM:SS.
        remaining: String,
        remaining_secs: i64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
