//! Activity history: modes, segments, and the append-only ledger.
//!
//! An [`Activity`] is one attempt at a work or break interval. While the
//! user pauses and resumes, the activity accumulates [`Segment`]s; the sum
//! of segment durations is the activity's authoritative elapsed time.
//!
//! The [`ActivityLedger`] holds the ordered history. At most one activity
//! is open (`end == None`) at any time and it is always the last entry.
//! Amendments address activities by their generated id, never by timestamp
//! equality.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

/// Which phase an interval represents.
///
/// Serialized with the labels the original front end persisted
/// (`"Work"`, `"Short Break"`, `"Long Break"`) so old data stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Work,
    #[serde(rename = "Short Break")]
    ShortBreak,
    #[serde(rename = "Long Break")]
    LongBreak,
}

impl Mode {
    pub fn is_work(self) -> bool {
        self == Mode::Work
    }

    pub fn is_break(self) -> bool {
        !self.is_work()
    }

    /// Human-readable label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Work",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable identity of an activity within the ledger.
pub type ActivityId = Uuid;

/// One contiguous run between a start/resume and a pause/stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `floor(end - start)` in whole seconds.
    pub elapsed_seconds: i64,
}

/// One logical interval attempt, possibly split across pause/resume
/// segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub mode: Mode,
    /// Only set for work intervals, taken from the configured label.
    #[serde(default)]
    pub title: Option<String>,
    /// Creation time of this activity.
    pub start: DateTime<Utc>,
    /// Set once finalized; `None` marks the open entry.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Chronological, non-overlapping runs.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Sum of all segment durations; the authoritative accumulated time.
    pub elapsed_seconds: i64,
    /// True only if the interval ran to its full target duration.
    pub completed: bool,
    /// Open-segment marker; non-null only while the timer is running.
    #[serde(default)]
    pub segment_start: Option<DateTime<Utc>>,
}

impl Activity {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn is_running(&self) -> bool {
        self.segment_start.is_some()
    }

    /// An open activity with no recorded time and no running segment.
    pub fn is_untouched(&self) -> bool {
        self.is_open() && self.elapsed_seconds == 0 && !self.is_running()
    }
}

/// Ordered history of activities.
///
/// Append-only, except that the last entry may be amended in place while
/// open and removed while still an unfinalized draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLedger {
    activities: Vec<Activity>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unstarted activity and append it as the open entry.
    pub fn begin(&mut self, mode: Mode, title: Option<String>, now: DateTime<Utc>) -> ActivityId {
        debug_assert!(self.open_activity().is_none(), "ledger already has an open entry");
        let id = Uuid::new_v4();
        self.activities.push(Activity {
            id,
            mode,
            title,
            start: now,
            end: None,
            segments: Vec::new(),
            elapsed_seconds: 0,
            completed: false,
            segment_start: None,
        });
        id
    }

    /// Open a segment on the activity.
    pub fn start_segment(&mut self, id: ActivityId, now: DateTime<Utc>) -> Result<(), LedgerError> {
        let activity = self.get_mut(id)?;
        if activity.segment_start.is_some() {
            return Err(LedgerError::SegmentAlreadyOpen(id));
        }
        activity.segment_start = Some(now);
        Ok(())
    }

    /// Close the open segment, accumulating its elapsed seconds.
    /// Returns the segment's duration.
    pub fn end_segment(&mut self, id: ActivityId, now: DateTime<Utc>) -> Result<i64, LedgerError> {
        let activity = self.get_mut(id)?;
        let started = activity
            .segment_start
            .take()
            .ok_or(LedgerError::NoOpenSegment(id))?;
        let elapsed = (now - started).num_seconds().max(0);
        activity.segments.push(Segment {
            start: started,
            end: now,
            elapsed_seconds: elapsed,
        });
        activity.elapsed_seconds += elapsed;
        Ok(elapsed)
    }

    /// Close any open segment, then stamp the activity's end and outcome.
    pub fn finalize(
        &mut self,
        id: ActivityId,
        now: DateTime<Utc>,
        completed: bool,
    ) -> Result<(), LedgerError> {
        if self.get(id).ok_or(LedgerError::NotFound(id))?.end.is_some() {
            return Err(LedgerError::AlreadyFinalized(id));
        }
        if self.get(id).is_some_and(|a| a.is_running()) {
            self.end_segment(id, now)?;
        }
        let activity = self.get_mut(id)?;
        activity.end = Some(now);
        activity.completed = completed;
        Ok(())
    }

    /// Remove the last entry iff it is the given never-finalized draft.
    /// Returns whether an entry was removed.
    pub fn discard_draft(&mut self, id: ActivityId) -> bool {
        match self.activities.last() {
            Some(last) if last.id == id && last.is_open() && !last.completed => {
                self.activities.pop();
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: ActivityId) -> Result<&mut Activity, LedgerError> {
        self.activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(LedgerError::NotFound(id))
    }

    pub fn last(&self) -> Option<&Activity> {
        self.activities.last()
    }

    /// The single open entry, if any.
    pub fn open_activity(&self) -> Option<&Activity> {
        self.activities.last().filter(|a| a.is_open())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Completed work intervals across the whole history.
    pub fn completed_work_count(&self) -> u64 {
        self.activities
            .iter()
            .filter(|a| a.mode.is_work() && a.completed)
            .count() as u64
    }
}
