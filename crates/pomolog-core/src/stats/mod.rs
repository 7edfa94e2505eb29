//! Statistics derived from the activity ledger.
//!
//! Everything here is a pure recomputation over the full history. Nothing
//! is maintained incrementally, so the numbers cannot drift from the
//! ledger they describe.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityLedger;

/// Aggregate counters for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Completed work intervals.
    pub completed_pomodoros: u64,
    /// Full long-break cycles: `completed_pomodoros / sessions_before_long`.
    pub session_count: u64,
    /// Minutes of completed work, rounded to nearest.
    pub total_work_minutes: u64,
    /// Minutes of completed breaks (short and long), rounded to nearest.
    pub total_break_minutes: u64,
}

/// Completed work intervals per local calendar date, ascending, with a
/// parallel count sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHistogram {
    pub dates: Vec<NaiveDate>,
    pub counts: Vec<u64>,
}

pub fn summarize(ledger: &ActivityLedger, sessions_before_long: u32) -> Summary {
    let completed_pomodoros = ledger.completed_work_count();
    let session_count = if sessions_before_long == 0 {
        0
    } else {
        completed_pomodoros / u64::from(sessions_before_long)
    };
    let work_secs: i64 = ledger
        .iter()
        .filter(|a| a.completed && a.mode.is_work())
        .map(|a| a.elapsed_seconds)
        .sum();
    let break_secs: i64 = ledger
        .iter()
        .filter(|a| a.completed && a.mode.is_break())
        .map(|a| a.elapsed_seconds)
        .sum();
    Summary {
        completed_pomodoros,
        session_count,
        total_work_minutes: round_minutes(work_secs),
        total_break_minutes: round_minutes(break_secs),
    }
}

/// Group completed work intervals by the local calendar date of their
/// start.
pub fn daily_histogram(ledger: &ActivityLedger) -> DailyHistogram {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for activity in ledger.iter().filter(|a| a.completed && a.mode.is_work()) {
        let day = activity.start.with_timezone(&Local).date_naive();
        *per_day.entry(day).or_insert(0) += 1;
    }
    let (dates, counts) = per_day.into_iter().unzip();
    DailyHistogram { dates, counts }
}

fn round_minutes(secs: i64) -> u64 {
    (secs.max(0) as f64 / 60.0).round() as u64
}
