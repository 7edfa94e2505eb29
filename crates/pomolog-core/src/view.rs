//! Presentation payloads.
//!
//! The core exposes plain data; rendering belongs to whatever front end
//! consumes it. `Dashboard` bundles everything the original dashboard
//! screen showed: the live snapshot, the aggregate summary, and the
//! per-day histogram.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::stats::{DailyHistogram, Summary};

/// Format seconds as `MM:SS`. Negative values clamp to `00:00`; the
/// minutes field grows past two digits rather than wrapping.
pub fn format_mm_ss(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Progress through an interval, 0.0 ..= 100.0.
pub fn progress_pct(total_secs: i64, remaining_secs: i64) -> f64 {
    if total_secs <= 0 {
        return 0.0;
    }
    let done = (total_secs - remaining_secs).clamp(0, total_secs) as f64;
    done / total_secs as f64 * 100.0
}

/// Everything the dashboard renders in one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub snapshot: Event,
    pub summary: Summary,
    pub daily: DailyHistogram,
}
