//! Integration tests for the timer engine driven by a manual scheduler.

use proptest::prelude::*;
use tomatick_core::{
    Event, ManualScheduler, Preferences, RecordingNotifier, TimerConfig, TimerEngine, TimerMode,
    TimerState, TimerStatus,
};

type Engine = TimerEngine<ManualScheduler, RecordingNotifier>;

fn default_engine() -> Engine {
    TimerEngine::new(
        TimerState::default(),
        ManualScheduler::new(),
        RecordingNotifier::new(),
    )
}

fn engine_with(focus: u64, brk: u64) -> Engine {
    TimerEngine::new(
        TimerState::new(
            TimerConfig {
                focus_duration_secs: focus,
                break_duration_secs: brk,
            },
            Preferences::default(),
        ),
        ManualScheduler::new(),
        RecordingNotifier::new(),
    )
}

/// Deliver up to `n` ticks, stopping early if nothing is armed.
fn advance(engine: &mut Engine, n: u64) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..n {
        match engine.active_tick() {
            Some(handle) => events.extend(engine.on_tick(handle)),
            None => break,
        }
    }
    events
}

#[test]
fn test_full_focus_interval_completes_once() {
    let mut engine = default_engine();
    engine.start();

    let events = advance(&mut engine, 1500);
    let completions: Vec<_> = events.iter().filter(|e| e.is_completion()).collect();
    assert_eq!(completions.len(), 1);

    let state = engine.state();
    assert_eq!(state.sessions_completed(), 1);
    assert_eq!(state.mode(), TimerMode::Break);
    assert_eq!(state.remaining_secs(), 300);
    assert_eq!(state.status(), TimerStatus::Idle);
    assert_eq!(engine.notifier().cues.len(), 1);

    match completions[0] {
        Event::TimerCompleted {
            completed,
            next,
            sessions_completed,
            ..
        } => {
            assert_eq!(*completed, TimerMode::Focus);
            assert_eq!(*next, TimerMode::Break);
            assert_eq!(*sessions_completed, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_paused_timer_receives_no_ticks() {
    let mut engine = default_engine();
    engine.start();
    advance(&mut engine, 10);
    assert_eq!(engine.state().remaining_secs(), 1490);

    let stale = engine.active_tick().unwrap();
    engine.pause();
    assert!(advance(&mut engine, 5).is_empty());
    for _ in 0..5 {
        assert!(engine.on_tick(stale).is_none());
    }

    assert_eq!(engine.state().remaining_secs(), 1490);
    assert_eq!(engine.state().status(), TimerStatus::Paused);
    assert!(engine.scheduler().armed().is_none());
}

#[test]
fn test_reset_from_paused_restores_focus_duration() {
    let mut engine = default_engine();
    engine.start();
    advance(&mut engine, 10);
    engine.pause();

    engine.reset();
    let state = engine.state();
    assert_eq!(state.remaining_secs(), 1500);
    assert_eq!(state.status(), TimerStatus::Idle);
    assert_eq!(state.mode(), TimerMode::Focus);
    assert_eq!(state.sessions_completed(), 0);
}

#[test]
fn test_pause_then_start_keeps_remaining() {
    let mut engine = default_engine();
    engine.start();
    advance(&mut engine, 7);
    engine.pause();
    engine.start();
    assert_eq!(engine.state().remaining_secs(), 1493);
    advance(&mut engine, 1);
    assert_eq!(engine.state().remaining_secs(), 1492);
}

#[test]
fn test_full_cycle_alternates_modes() {
    let mut engine = engine_with(5, 2);
    for cycle in 1..=3u64 {
        engine.start();
        advance(&mut engine, 5);
        assert_eq!(engine.state().mode(), TimerMode::Break);
        assert_eq!(engine.state().sessions_completed(), cycle);

        engine.start();
        advance(&mut engine, 2);
        assert_eq!(engine.state().mode(), TimerMode::Focus);
        assert_eq!(engine.state().remaining_secs(), 5);
        assert_eq!(engine.state().sessions_completed(), cycle);
    }
    assert_eq!(engine.notifier().cues.len(), 6);
}

#[test]
fn test_deferred_break_duration_applies_on_transition() {
    let mut engine = engine_with(3, 2);
    engine.start();
    advance(&mut engine, 1);
    engine.set_break_duration(10);
    engine.set_focus_duration(8);
    assert_eq!(engine.state().remaining_secs(), 2);

    advance(&mut engine, 2);
    assert_eq!(engine.state().mode(), TimerMode::Break);
    assert_eq!(engine.state().remaining_secs(), 10);

    engine.start();
    advance(&mut engine, 10);
    assert_eq!(engine.state().remaining_secs(), 8);
}

#[test]
fn test_reset_twice_matches_reset_once() {
    let mut engine = default_engine();
    engine.start();
    advance(&mut engine, 42);
    engine.reset();
    let once = engine.snapshot();
    engine.reset();
    assert_eq!(engine.snapshot(), once);
}

#[test]
fn test_independent_engines_do_not_share_state() {
    let mut a = default_engine();
    let mut b = engine_with(60, 30);
    a.start();
    b.start();
    advance(&mut a, 3);
    assert_eq!(a.state().remaining_secs(), 1497);
    assert_eq!(b.state().remaining_secs(), 60);
}

proptest! {
    #[test]
    fn prop_ticks_count_down_to_zero(initial in 1u64..400, n in 0u64..400) {
        let mut engine = engine_with(initial, 17);
        engine.start();
        let events = advance(&mut engine, n);

        if n < initial {
            prop_assert!(events.is_empty());
            prop_assert_eq!(engine.state().remaining_secs(), initial - n);
            prop_assert_eq!(engine.state().status(), TimerStatus::Running);
        } else {
            prop_assert_eq!(events.len(), 1);
            prop_assert_eq!(engine.state().sessions_completed(), 1);
            prop_assert_eq!(engine.state().remaining_secs(), 17);
            prop_assert_eq!(engine.state().status(), TimerStatus::Idle);
        }
    }

    #[test]
    fn prop_pause_resume_never_loses_time(split in 1u64..100, rest in 0u64..100) {
        let mut engine = engine_with(500, 60);
        engine.start();
        advance(&mut engine, split);
        engine.pause();
        engine.start();
        advance(&mut engine, rest);
        prop_assert_eq!(engine.state().remaining_secs(), 500 - split - rest);
    }
}
