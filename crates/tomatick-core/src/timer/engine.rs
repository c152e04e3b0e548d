//! Timer engine implementation.
//!
//! The engine drives a [`TimerState`] forward one second at a time. It has
//! no internal thread: it arms a subscription on an injected
//! [`TickScheduler`] and the host calls [`TimerEngine::on_tick`] with the
//! handle each time that subscription fires.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle (completion or reset)
//! ```
//!
//! ## Usage
//!
//! ```
//! use tomatick_core::timer::{ManualScheduler, SilentNotifier, TimerEngine, TimerState};
//!
//! let mut engine = TimerEngine::new(TimerState::default(), ManualScheduler::new(), SilentNotifier);
//! engine.start();
//! while let Some(handle) = engine.active_tick() {
//!     engine.on_tick(handle); // Some(Event::TimerCompleted { .. }) at zero
//! }
//! ```

use chrono::Utc;
use std::time::Duration;

use super::notifier::{CompletionCue, Notifier};
use super::scheduler::{TickHandle, TickScheduler, TICK_INTERVAL};
use super::state::{TimerMode, TimerSnapshot, TimerState, TimerStatus};
use crate::events::Event;

/// Core timer engine.
///
/// Owns exactly one state, one scheduler, one notifier and at most one live
/// tick subscription. Every command takes `&mut self`, so commands and ticks
/// are serialized by construction.
#[derive(Debug)]
pub struct TimerEngine<S, N> {
    state: TimerState,
    scheduler: S,
    notifier: N,
    interval: Duration,
    /// Subscription armed by the last `start()`; `Some` iff Running.
    active_tick: Option<TickHandle>,
}

impl<S: TickScheduler, N: Notifier> TimerEngine<S, N> {
    /// Create an engine around `state` ticking every [`TICK_INTERVAL`].
    ///
    /// A state handed over mid-run is parked as Paused, since no
    /// subscription exists for it yet; `start()` resumes it.
    pub fn new(state: TimerState, scheduler: S, notifier: N) -> Self {
        Self::with_interval(state, scheduler, notifier, TICK_INTERVAL)
    }

    pub fn with_interval(state: TimerState, scheduler: S, notifier: N, interval: Duration) -> Self {
        let mut engine = Self {
            state,
            scheduler,
            notifier,
            interval,
            active_tick: None,
        };
        engine.settle_adopted_state();
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot()
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            snapshot: self.state.snapshot(),
            at: Utc::now(),
        }
    }

    /// The subscription ticks must carry to be applied.
    pub fn active_tick(&self) -> Option<TickHandle> {
        self.active_tick
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let from = self.state.status();
        match from {
            TimerStatus::Running => None, // Already running.
            TimerStatus::Idle | TimerStatus::Paused => {
                self.state.set_status(TimerStatus::Running);
                self.active_tick = Some(self.scheduler.schedule(self.interval));
                tracing::debug!(
                    mode = self.state.mode().as_str(),
                    remaining_secs = self.state.remaining_secs(),
                    "timer running"
                );
                let mode = self.state.mode();
                let remaining_secs = self.state.remaining_secs();
                let at = Utc::now();
                Some(if from == TimerStatus::Paused {
                    Event::TimerResumed {
                        mode,
                        remaining_secs,
                        at,
                    }
                } else {
                    Event::TimerStarted {
                        mode,
                        remaining_secs,
                        at,
                    }
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state.status() != TimerStatus::Running {
            return None;
        }
        self.cancel_tick();
        self.state.set_status(TimerStatus::Paused);
        tracing::debug!(remaining_secs = self.state.remaining_secs(), "timer paused");
        Some(Event::TimerPaused {
            remaining_secs: self.state.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Back to Idle with a full countdown for the current mode. Mode and
    /// session count are left alone.
    pub fn reset(&mut self) -> Option<Event> {
        self.cancel_tick();
        let mode = self.state.mode();
        self.state.set_remaining(self.state.duration_for(mode));
        self.state.set_status(TimerStatus::Idle);
        tracing::debug!(mode = mode.as_str(), "timer reset");
        Some(Event::TimerReset {
            mode,
            remaining_secs: self.state.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Apply one tick. Returns `Some(Event::TimerCompleted)` when the
    /// interval finishes. Ticks from any subscription other than the active
    /// one are ignored.
    pub fn on_tick(&mut self, handle: TickHandle) -> Option<Event> {
        if self.active_tick != Some(handle) || self.state.status() != TimerStatus::Running {
            tracing::trace!(tick = handle.id(), "stale tick ignored");
            return None;
        }
        let remaining = self.state.remaining_secs().saturating_sub(1);
        self.state.set_remaining(remaining);
        if remaining == 0 {
            return Some(self.complete());
        }
        None
    }

    pub fn set_focus_duration(&mut self, secs: u64) -> Option<Event> {
        self.set_duration(TimerMode::Focus, secs)
    }

    pub fn set_break_duration(&mut self, secs: u64) -> Option<Event> {
        self.set_duration(TimerMode::Break, secs)
    }

    pub fn toggle_theme(&mut self) -> Option<Event> {
        self.state.toggle_theme();
        Some(self.preference_event())
    }

    pub fn toggle_sound(&mut self) -> Option<Event> {
        self.state.toggle_sound();
        Some(self.preference_event())
    }

    /// Replace the driven state, returning the previous one.
    ///
    /// Any pending tick is cancelled first; the outgoing state is handed back
    /// Paused if it was running so it can be resumed under another engine.
    pub fn swap_state(&mut self, state: TimerState) -> TimerState {
        self.cancel_tick();
        let mut previous = std::mem::replace(&mut self.state, state);
        if previous.status() == TimerStatus::Running {
            previous.set_status(TimerStatus::Paused);
        }
        self.settle_adopted_state();
        previous
    }

    pub fn into_parts(mut self) -> (TimerState, S, N) {
        self.cancel_tick();
        (self.state, self.scheduler, self.notifier)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_duration(&mut self, mode: TimerMode, secs: u64) -> Option<Event> {
        let before = self.state.remaining_secs();
        match mode {
            TimerMode::Focus => self.state.set_focus_duration(secs),
            TimerMode::Break => self.state.set_break_duration(secs),
        }
        let applied = self.state.mode() == mode && self.state.status() == TimerStatus::Idle;
        tracing::debug!(
            mode = mode.as_str(),
            duration_secs = secs,
            applied,
            remaining_before = before,
            "duration changed"
        );
        Some(Event::DurationChanged {
            mode,
            duration_secs: secs,
            applied,
            at: Utc::now(),
        })
    }

    fn preference_event(&self) -> Event {
        let prefs = self.state.preferences();
        Event::PreferenceChanged {
            theme: prefs.theme,
            sound_enabled: prefs.sound_enabled,
            at: Utc::now(),
        }
    }

    fn complete(&mut self) -> Event {
        self.cancel_tick();
        let completed = self.state.mode();
        let next = completed.next();
        let mut sessions_completed = self.state.sessions_completed();
        if completed == TimerMode::Focus {
            sessions_completed += 1;
        }

        let cue = CompletionCue {
            completed,
            next,
            sessions_completed,
        };
        if self.state.preferences().sound_enabled {
            if let Err(err) = self.notifier.notify(&cue) {
                tracing::warn!(error = %err, "completion cue not delivered");
            }
        }

        if completed == TimerMode::Focus {
            self.state.increment_sessions_completed();
        }
        self.state.set_mode(next);
        self.state.set_status(TimerStatus::Idle);

        tracing::info!(
            completed = completed.as_str(),
            next = next.as_str(),
            sessions_completed = cue.sessions_completed,
            "interval completed"
        );
        Event::TimerCompleted {
            completed,
            next,
            sessions_completed: cue.sessions_completed,
            at: Utc::now(),
        }
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.active_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// A freshly adopted state has no subscription behind it.
    fn settle_adopted_state(&mut self) {
        if self.state.status() == TimerStatus::Running {
            self.state.set_status(TimerStatus::Paused);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{ManualScheduler, Preferences, RecordingNotifier, TimerConfig};

    type TestEngine = TimerEngine<ManualScheduler, RecordingNotifier>;

    fn engine_with(focus: u64, brk: u64) -> TestEngine {
        let config = TimerConfig {
            focus_duration_secs: focus,
            break_duration_secs: brk,
        };
        TimerEngine::new(
            TimerState::new(config, Preferences::default()),
            ManualScheduler::new(),
            RecordingNotifier::new(),
        )
    }

    fn tick(engine: &mut TestEngine, n: usize) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..n {
            if let Some(handle) = engine.active_tick() {
                events.extend(engine.on_tick(handle));
            }
        }
        events
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = engine_with(60, 30);
        assert_eq!(engine.state().status(), TimerStatus::Idle);

        assert!(matches!(engine.start(), Some(Event::TimerStarted { .. })));
        assert_eq!(engine.state().status(), TimerStatus::Running);
        assert!(engine.scheduler().armed().is_some());

        assert!(engine.pause().is_some());
        assert_eq!(engine.state().status(), TimerStatus::Paused);
        assert!(engine.scheduler().armed().is_none());

        assert!(matches!(engine.start(), Some(Event::TimerResumed { .. })));
        assert_eq!(engine.state().status(), TimerStatus::Running);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut engine = engine_with(60, 30);
        engine.start();
        let handle = engine.active_tick();
        assert!(engine.start().is_none());
        assert_eq!(engine.active_tick(), handle);
    }

    #[test]
    fn pause_outside_running_is_noop() {
        let mut engine = engine_with(60, 30);
        assert!(engine.pause().is_none());
        engine.start();
        engine.pause();
        assert!(engine.pause().is_none());
        assert_eq!(engine.state().status(), TimerStatus::Paused);
    }

    #[test]
    fn ticks_decrement_while_running() {
        let mut engine = engine_with(60, 30);
        engine.start();
        assert!(tick(&mut engine, 10).is_empty());
        assert_eq!(engine.state().remaining_secs(), 50);
    }

    #[test]
    fn stale_tick_after_pause_is_ignored() {
        let mut engine = engine_with(60, 30);
        engine.start();
        let old = engine.active_tick().unwrap();
        tick(&mut engine, 3);
        engine.pause();
        engine.start();
        assert!(engine.on_tick(old).is_none());
        assert_eq!(engine.state().remaining_secs(), 57);
    }

    #[test]
    fn stale_tick_after_reset_is_ignored() {
        let mut engine = engine_with(60, 30);
        engine.start();
        let old = engine.active_tick().unwrap();
        tick(&mut engine, 5);
        engine.reset();
        assert!(engine.on_tick(old).is_none());
        assert_eq!(engine.state().remaining_secs(), 60);
        assert_eq!(engine.state().status(), TimerStatus::Idle);
    }

    #[test]
    fn focus_completion_moves_to_break() {
        let mut engine = engine_with(3, 2);
        engine.start();
        let events = tick(&mut engine, 3);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_completion());

        let state = engine.state();
        assert_eq!(state.sessions_completed(), 1);
        assert_eq!(state.mode(), TimerMode::Break);
        assert_eq!(state.remaining_secs(), 2);
        assert_eq!(state.status(), TimerStatus::Idle);
        assert!(engine.active_tick().is_none());
        assert_eq!(engine.notifier().cues.len(), 1);
    }

    #[test]
    fn break_completion_keeps_session_count() {
        let mut engine = engine_with(1, 2);
        engine.start();
        tick(&mut engine, 1);
        engine.start();
        let events = tick(&mut engine, 2);
        assert_eq!(events.len(), 1);
        assert_eq!(engine.state().sessions_completed(), 1);
        assert_eq!(engine.state().mode(), TimerMode::Focus);
        assert_eq!(engine.state().remaining_secs(), 1);
        let cue = engine.notifier().cues[1];
        assert_eq!(cue.completed, TimerMode::Break);
        assert_eq!(cue.next, TimerMode::Focus);
    }

    #[test]
    fn completion_does_not_auto_start() {
        let mut engine = engine_with(2, 2);
        engine.start();
        tick(&mut engine, 10);
        assert_eq!(engine.state().mode(), TimerMode::Break);
        assert_eq!(engine.state().remaining_secs(), 2);
        assert_eq!(engine.state().sessions_completed(), 1);
    }

    #[test]
    fn zero_remaining_completes_on_next_tick() {
        let mut engine = engine_with(60, 30);
        let mut state = engine.state().clone();
        state.set_remaining(0);
        engine.swap_state(state);
        engine.start();
        let events = tick(&mut engine, 1);
        assert_eq!(events.len(), 1);
        assert_eq!(engine.state().mode(), TimerMode::Break);
        assert_eq!(engine.state().remaining_secs(), 30);
    }

    #[test]
    fn sound_disabled_skips_notifier() {
        let mut engine = engine_with(1, 1);
        engine.toggle_sound();
        engine.start();
        tick(&mut engine, 1);
        assert!(engine.notifier().cues.is_empty());
        assert_eq!(engine.state().sessions_completed(), 1);
    }

    #[test]
    fn notifier_failure_is_swallowed() {
        let mut engine = TimerEngine::new(
            TimerState::new(
                TimerConfig {
                    focus_duration_secs: 1,
                    break_duration_secs: 1,
                },
                Preferences::default(),
            ),
            ManualScheduler::new(),
            RecordingNotifier::failing(),
        );
        engine.start();
        let events = tick(&mut engine, 1);
        assert_eq!(events.len(), 1);
        assert_eq!(engine.state().mode(), TimerMode::Break);
        assert_eq!(engine.state().status(), TimerStatus::Idle);
    }

    #[test]
    fn reset_is_idempotent_and_keeps_mode() {
        let mut engine = engine_with(4, 3);
        engine.start();
        tick(&mut engine, 4);
        engine.start();
        tick(&mut engine, 1);
        engine.reset();
        let once = engine.state().clone();
        engine.reset();
        assert_eq!(engine.state(), &once);
        assert_eq!(once.mode(), TimerMode::Break);
        assert_eq!(once.remaining_secs(), 3);
        assert_eq!(once.sessions_completed(), 1);
    }

    #[test]
    fn duration_change_applies_only_when_idle() {
        let mut engine = engine_with(60, 30);
        match engine.set_focus_duration(90) {
            Some(Event::DurationChanged { applied, .. }) => assert!(applied),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(engine.state().remaining_secs(), 90);

        engine.start();
        tick(&mut engine, 1);
        match engine.set_focus_duration(120) {
            Some(Event::DurationChanged { applied, .. }) => assert!(!applied),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(engine.state().remaining_secs(), 89);

        engine.reset();
        assert_eq!(engine.state().remaining_secs(), 120);
    }

    #[test]
    fn swap_state_cancels_pending_tick() {
        let mut engine = engine_with(60, 30);
        engine.start();
        let old = engine.active_tick().unwrap();
        let previous = engine.swap_state(TimerState::default());
        assert_eq!(previous.status(), TimerStatus::Paused);
        assert!(engine.active_tick().is_none());
        assert!(engine.scheduler().was_cancelled(old));
        assert!(engine.on_tick(old).is_none());
        assert_eq!(engine.state().remaining_secs(), 25 * 60);
    }

    #[test]
    fn adopting_running_state_pauses_it() {
        let mut state = TimerState::default();
        state.set_status(TimerStatus::Running);
        let engine = TimerEngine::new(state, ManualScheduler::new(), RecordingNotifier::new());
        assert_eq!(engine.state().status(), TimerStatus::Paused);
    }

    #[test]
    fn snapshot_event_reflects_state() {
        let engine = engine_with(60, 30);
        match engine.snapshot_event() {
            Event::StateSnapshot { snapshot, .. } => {
                assert_eq!(snapshot.status, TimerStatus::Idle);
                assert_eq!(snapshot.remaining_secs, 60);
                assert_eq!(snapshot.break_duration_secs, 30);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
