//! # Pomolog Core Library
//!
//! Core business logic for the Pomolog productivity timer: the
//! work/break state machine, the pause/resume activity history, and the
//! statistics derived from it. All operations are available through the
//! standalone CLI binary; any richer front end is a thin layer over this
//! same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates
//! - **Activity Ledger**: the ordered history of work/break intervals,
//!   each split into pause/resume segments
//! - **Statistics**: pure aggregations recomputed from the full ledger
//! - **Storage**: string-keyed record store backed by SQLite
//! - **Collaborators**: notification/sound traits the embedding
//!   application implements
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`ActivityLedger`]: activity history and amendment operations
//! - [`Database`]: durable record storage
//! - [`Settings`]: user configuration with commit-boundary validation

pub mod activity;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod view;

pub use activity::{Activity, ActivityId, ActivityLedger, Mode, Segment};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, LedgerError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{Notifier, Permission, SoundPlayer};
pub use stats::{daily_histogram, summarize, DailyHistogram, Summary};
pub use storage::{Database, KvStore, MemoryStore, Settings};
pub use timer::{TimerEngine, TimerState};
pub use view::Dashboard;
