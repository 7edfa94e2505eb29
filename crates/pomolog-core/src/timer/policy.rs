//! Mode transition policy.

use crate::activity::Mode;

/// Compute the mode that follows `current`.
///
/// After a work interval, every `sessions_before_long`-th completed work
/// interval earns a long break; otherwise a short one. Breaks always lead
/// back to work. With `sessions_before_long == 0` the long break never
/// comes up.
///
/// `completed_work` is the ledger-wide count of completed work intervals,
/// including the one whose completion triggered this call.
pub fn next_mode(current: Mode, completed_work: u64, sessions_before_long: u32) -> Mode {
    match current {
        Mode::Work => {
            if sessions_before_long > 0
                && completed_work > 0
                && completed_work % u64::from(sessions_before_long) == 0
            {
                Mode::LongBreak
            } else {
                Mode::ShortBreak
            }
        }
        Mode::ShortBreak | Mode::LongBreak => Mode::Work,
    }
}
