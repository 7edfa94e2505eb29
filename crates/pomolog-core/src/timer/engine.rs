//! Timer engine implementation.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads and never reads the system clock itself -- every operation takes
//! the current instant, and the caller is responsible for calling `tick()`
//! periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle
//! ```
//!
//! Remaining time is derived from a stored target instant rather than a
//! decremented counter, so a slow or suspended caller cannot make the
//! countdown drift. When the target is reached, the final segment is closed
//! at the target instant: a completed activity's elapsed time never exceeds
//! its configured duration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::policy;
use crate::activity::{ActivityId, ActivityLedger, Mode};
use crate::error::ValidationError;
use crate::events::Event;
use crate::storage::Settings;
use crate::view;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Orchestrates the activity ledger: one open draft activity at a time,
/// referenced by id. Serializable so the application can persist runtime
/// state between invocations; the ledger is persisted separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: Settings,
    mode: Mode,
    state: TimerState,
    /// Remaining seconds; authoritative while not running.
    remaining_secs: i64,
    /// Instant the countdown reaches zero; set only while running.
    #[serde(default)]
    target_end: Option<DateTime<Utc>>,
    /// The open draft activity, if any.
    #[serde(default)]
    current: Option<ActivityId>,
}

impl TimerEngine {
    /// Create an idle engine in work mode with a full countdown.
    pub fn new(settings: Settings) -> Self {
        let remaining_secs = settings.duration_secs(Mode::Work);
        Self {
            settings,
            mode: Mode::Work,
            state: TimerState::Idle,
            remaining_secs,
            target_end: None,
            current: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_activity(&self) -> Option<ActivityId> {
        self.current
    }

    /// Remaining seconds at `now`, never negative.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        match self.target_end {
            Some(target) if self.state == TimerState::Running => {
                (target - now).num_seconds().max(0)
            }
            _ => self.remaining_secs,
        }
    }

    /// Build a full state snapshot event for the presentation layer.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        let remaining = self.remaining_secs(now);
        let total = self.settings.duration_secs(self.mode);
        Event::StateSnapshot {
            mode: self.mode,
            state: self.state,
            title: self
                .settings
                .title_for(self.mode)
                .unwrap_or_else(|| self.mode.label().to_string()),
            remaining: view::format_mm_ss(remaining),
            remaining_secs: remaining,
            progress_pct: view::progress_pct(total, remaining),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `Idle | Paused -> Running`. Begins a fresh activity when none is
    /// open, otherwise resumes the existing one with a new segment.
    pub fn start(&mut self, ledger: &mut ActivityLedger, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                let id = match self.current {
                    Some(id) => id,
                    None => {
                        let id = ledger.begin(self.mode, self.settings.title_for(self.mode), now);
                        self.current = Some(id);
                        id
                    }
                };
                if let Err(e) = ledger.start_segment(id, now) {
                    log::warn!("start: ledger rejected segment: {e}");
                    return None;
                }
                self.state = TimerState::Running;
                self.target_end = Some(now + Duration::seconds(self.remaining_secs));
                Some(Event::TimerStarted {
                    mode: self.mode,
                    remaining_secs: self.remaining_secs,
                    at: now,
                })
            }
            TimerState::Running => None, // Already running.
        }
    }

    /// `Running -> Paused`. Closes the open segment. No-op otherwise.
    pub fn pause(&mut self, ledger: &mut ActivityLedger, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let remaining = self.remaining_secs(now);
        let cut = self.run_cutoff(now);
        if let Some(id) = self.current {
            if let Err(e) = ledger.end_segment(id, cut) {
                log::warn!("pause: ledger rejected segment close: {e}");
            }
        }
        self.state = TimerState::Paused;
        self.remaining_secs = remaining;
        self.target_end = None;
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: remaining,
            at: now,
        })
    }

    /// Any state -> `Idle`. A never-finalized draft is removed from the
    /// ledger entirely; the countdown returns to the mode's full duration.
    pub fn reset(&mut self, ledger: &mut ActivityLedger, now: DateTime<Utc>) -> Event {
        if let Some(id) = self.current.take() {
            ledger.discard_draft(id);
        }
        self.rearm();
        Event::TimerReset {
            mode: self.mode,
            at: now,
        }
    }

    /// Manual mode override. The current activity keeps only the time it
    /// actually ran and is finalized as not completed; an untouched draft
    /// leaves no trace. A fresh draft is opened for the requested mode.
    pub fn set_mode(&mut self, ledger: &mut ActivityLedger, mode: Mode, now: DateTime<Utc>) -> Event {
        let from = self.mode;
        let cut = self.run_cutoff(now);
        self.close_current(ledger, cut, false);
        self.mode = mode;
        self.rearm();
        self.current = Some(ledger.begin(self.mode, self.settings.title_for(self.mode), now));
        Event::ModeChanged {
            from,
            to: mode,
            at: now,
        }
    }

    /// Call periodically while running. Returns `Some(Event::TimerFinished)`
    /// once the countdown reaches zero: the activity is finalized as
    /// completed at the target instant, the next mode is chosen (strictly
    /// after finalization, since the policy reads the ledger), a draft is
    /// opened for it, and the countdown optionally auto-starts.
    pub fn tick(&mut self, ledger: &mut ActivityLedger, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let target = self.target_end?;
        if now < target {
            return None;
        }

        let finished = self.mode;
        self.close_current(ledger, target, true);
        self.mode = policy::next_mode(
            finished,
            ledger.completed_work_count(),
            self.settings.sessions_before_long_break,
        );
        self.rearm();
        self.current = Some(ledger.begin(self.mode, self.settings.title_for(self.mode), now));

        let auto_started = self.settings.auto_start;
        if auto_started {
            self.start(ledger, now);
        }
        Some(Event::TimerFinished {
            mode: finished,
            next_mode: self.mode,
            auto_started,
            at: now,
        })
    }

    /// Commit a settings draft. Validation failures leave engine and
    /// ledger untouched; success swaps the settings and resets the timer.
    pub fn commit_settings(
        &mut self,
        ledger: &mut ActivityLedger,
        draft: Settings,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        draft.validate()?;
        self.settings = draft;
        if let Some(id) = self.current.take() {
            ledger.discard_draft(id);
        }
        self.rearm();
        Ok(Event::SettingsCommitted { at: now })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Where a closing segment ends: `now`, capped at the target instant
    /// so recorded time can never exceed the configured duration even when
    /// the caller reports in late.
    fn run_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.target_end {
            Some(target) if self.state == TimerState::Running && now > target => target,
            _ => now,
        }
    }

    /// Back to `Idle` with a full countdown for the active mode.
    fn rearm(&mut self) {
        self.state = TimerState::Idle;
        self.target_end = None;
        self.remaining_secs = self.settings.duration_secs(self.mode);
    }

    /// Finalize the current activity at `at`, or drop it if untouched.
    fn close_current(&mut self, ledger: &mut ActivityLedger, at: DateTime<Utc>, completed: bool) {
        if let Some(id) = self.current.take() {
            if ledger.get(id).is_some_and(|a| a.is_untouched()) {
                ledger.discard_draft(id);
            } else if let Err(e) = ledger.finalize(id, at, completed) {
                log::warn!("could not finalize activity {id}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn engine() -> (TimerEngine, ActivityLedger) {
        (TimerEngine::new(Settings::default()), ActivityLedger::new())
    }

    #[test]
    fn start_opens_activity_and_counts_down() {
        let (mut engine, mut ledger) = engine();
        let ev = engine.start(&mut ledger, t0()).unwrap();
        assert!(matches!(ev, Event::TimerStarted { mode: Mode::Work, remaining_secs: 1500, .. }));
        assert_eq!(engine.state(), TimerState::Running);

        let a = ledger.open_activity().unwrap();
        assert_eq!(a.title.as_deref(), Some("Work"));
        assert!(a.is_running());
        assert_eq!(engine.remaining_secs(t0() + Duration::seconds(90)), 1410);
    }

    #[test]
    fn start_while_running_is_noop() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        assert!(engine.start(&mut ledger, t0() + Duration::seconds(5)).is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn pause_closes_segment_and_freezes_remaining() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        let ev = engine.pause(&mut ledger, t0() + Duration::seconds(60)).unwrap();
        assert!(matches!(ev, Event::TimerPaused { remaining_secs: 1440, .. }));
        assert_eq!(engine.state(), TimerState::Paused);

        let a = ledger.open_activity().unwrap();
        assert_eq!(a.segments.len(), 1);
        assert_eq!(a.elapsed_seconds, 60);
        assert!(!a.is_running());
        // Frozen: time passing does not change remaining.
        assert_eq!(engine.remaining_secs(t0() + Duration::seconds(999)), 1440);
    }

    #[test]
    fn pause_when_not_running_is_noop() {
        let (mut engine, mut ledger) = engine();
        assert!(engine.pause(&mut ledger, t0()).is_none());
    }

    #[test]
    fn resume_continues_same_activity() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        engine.pause(&mut ledger, t0() + Duration::seconds(60));
        engine.start(&mut ledger, t0() + Duration::seconds(300));
        assert_eq!(ledger.len(), 1);
        let a = ledger.open_activity().unwrap();
        assert!(a.is_running());
        engine.pause(&mut ledger, t0() + Duration::seconds(360));
        assert_eq!(ledger.open_activity().unwrap().elapsed_seconds, 120);
    }

    #[test]
    fn reset_removes_never_finalized_draft() {
        let (mut engine, mut ledger) = engine();
        let before = ledger.len();
        engine.start(&mut ledger, t0());
        engine.reset(&mut ledger, t0() + Duration::seconds(42));
        assert_eq!(ledger.len(), before);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(t0() + Duration::seconds(60)), 1500);
        assert!(engine.current_activity().is_none());
    }

    #[test]
    fn tick_before_target_is_silent() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        assert!(engine.tick(&mut ledger, t0() + Duration::seconds(1499)).is_none());
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn tick_at_target_finishes_and_switches_to_short_break() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        let ev = engine.tick(&mut ledger, t0() + Duration::seconds(1500)).unwrap();
        assert!(matches!(
            ev,
            Event::TimerFinished { mode: Mode::Work, next_mode: Mode::ShortBreak, auto_started: false, .. }
        ));
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert_eq!(engine.remaining_secs(t0()), 300);

        // History: the completed work interval plus the open break draft.
        assert_eq!(ledger.len(), 2);
        let done = ledger.iter().next().unwrap();
        assert!(done.completed);
        assert_eq!(done.elapsed_seconds, 1500);
        assert!(ledger.open_activity().is_some());
    }

    #[test]
    fn late_tick_clamps_elapsed_to_target() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        // The caller went away; the tick arrives 40s late.
        engine.tick(&mut ledger, t0() + Duration::seconds(1540)).unwrap();
        let done = ledger.iter().next().unwrap();
        assert_eq!(done.elapsed_seconds, 1500);
        assert_eq!(done.end, Some(t0() + Duration::seconds(1500)));
    }

    #[test]
    fn late_pause_clamps_the_segment_at_the_target() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        // The caller reports in well past the end of the interval.
        let ev = engine.pause(&mut ledger, t0() + Duration::seconds(1700)).unwrap();
        assert!(matches!(ev, Event::TimerPaused { remaining_secs: 0, .. }));
        let a = ledger.open_activity().unwrap();
        assert_eq!(a.elapsed_seconds, 1500);
        assert_eq!(a.segments[0].end, t0() + Duration::seconds(1500));
    }

    #[test]
    fn fourth_completed_work_earns_long_break() {
        let (mut engine, mut ledger) = engine();
        let mut at = t0();
        for round in 1..=4u32 {
            engine.set_mode(&mut ledger, Mode::Work, at);
            engine.start(&mut ledger, at);
            at += Duration::seconds(1500);
            let ev = engine.tick(&mut ledger, at).unwrap();
            let expected = if round == 4 { Mode::LongBreak } else { Mode::ShortBreak };
            assert!(
                matches!(ev, Event::TimerFinished { next_mode, .. } if next_mode == expected),
                "round {round}"
            );
        }
        assert_eq!(ledger.completed_work_count(), 4);
    }

    #[test]
    fn set_mode_mid_run_keeps_only_time_actually_run() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        let ev = engine.set_mode(&mut ledger, Mode::ShortBreak, t0() + Duration::seconds(420));
        assert!(matches!(ev, Event::ModeChanged { from: Mode::Work, to: Mode::ShortBreak, .. }));

        let abandoned = ledger.iter().next().unwrap();
        assert!(!abandoned.completed);
        assert_eq!(abandoned.elapsed_seconds, 420);
        assert_eq!(abandoned.end, Some(t0() + Duration::seconds(420)));

        // A fresh break draft is open and the countdown is full.
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(t0()), 300);
        assert_eq!(ledger.open_activity().unwrap().mode, Mode::ShortBreak);
    }

    #[test]
    fn set_mode_on_untouched_draft_leaves_no_trace() {
        let (mut engine, mut ledger) = engine();
        engine.set_mode(&mut ledger, Mode::ShortBreak, t0());
        engine.set_mode(&mut ledger, Mode::LongBreak, t0() + Duration::seconds(3));
        // Only the live draft remains; the untouched one vanished.
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.open_activity().unwrap().mode, Mode::LongBreak);
    }

    #[test]
    fn auto_start_rolls_into_the_next_interval() {
        let mut settings = Settings::default();
        settings.auto_start = true;
        let mut engine = TimerEngine::new(settings);
        let mut ledger = ActivityLedger::new();

        engine.start(&mut ledger, t0());
        let ev = engine.tick(&mut ledger, t0() + Duration::seconds(1500)).unwrap();
        assert!(matches!(ev, Event::TimerFinished { auto_started: true, .. }));
        assert_eq!(engine.state(), TimerState::Running);
        assert!(ledger.open_activity().unwrap().is_running());
        assert_eq!(engine.mode(), Mode::ShortBreak);
    }

    #[test]
    fn commit_settings_resets_with_new_durations() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());

        let mut draft = engine.settings().clone();
        draft.work_minutes = 50;
        engine
            .commit_settings(&mut ledger, draft, t0() + Duration::seconds(100))
            .unwrap();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(t0()), 3000);
        assert!(ledger.is_empty()); // running draft was discarded by the reset
    }

    #[test]
    fn invalid_settings_draft_is_rejected_and_state_kept() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());

        let mut draft = engine.settings().clone();
        draft.work_minutes = 0;
        assert!(engine
            .commit_settings(&mut ledger, draft, t0() + Duration::seconds(5))
            .is_err());
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.settings().work_minutes, 25);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn snapshot_formats_remaining() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        let snap = engine.snapshot(t0() + Duration::seconds(90));
        match snap {
            Event::StateSnapshot { remaining, remaining_secs, state, .. } => {
                assert_eq!(remaining, "23:30");
                assert_eq!(remaining_secs, 1410);
                assert_eq!(state, TimerState::Running);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn engine_state_roundtrips_through_json() {
        let (mut engine, mut ledger) = engine();
        engine.start(&mut ledger, t0());
        engine.pause(&mut ledger, t0() + Duration::seconds(30));

        let json = serde_json::to_string(&engine).unwrap();
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), TimerState::Paused);
        assert_eq!(restored.mode(), Mode::Work);
        assert_eq!(restored.remaining_secs(t0()), 1470);
        assert_eq!(restored.current_activity(), engine.current_activity());
    }
}
