mod engine;
pub mod policy;

pub use engine::{TimerEngine, TimerState};
