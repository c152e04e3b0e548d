use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Theme, TimerMode, TimerSnapshot};

/// Every state change made through the engine produces an Event.
/// The presentation layer renders them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        completed: TimerMode,
        next: TimerMode,
        sessions_completed: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        mode: TimerMode,
        duration_secs: u64,
        /// Whether the running countdown picked the new value up right away.
        applied: bool,
        at: DateTime<Utc>,
    },
    PreferenceChanged {
        theme: Theme,
        sound_enabled: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        #[serde(flatten)]
        snapshot: TimerSnapshot,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// When the event was produced.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerResumed { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::TimerCompleted { at, .. }
            | Event::DurationChanged { at, .. }
            | Event::PreferenceChanged { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
