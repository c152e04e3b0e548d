mod engine;
mod notifier;
mod scheduler;
mod state;

pub use engine::TimerEngine;
pub use notifier::{CompletionCue, Notifier, RecordingNotifier, SilentNotifier};
pub use scheduler::{ManualScheduler, TickHandle, TickScheduler, TICK_INTERVAL};
pub use state::{
    Preferences, Theme, TimerConfig, TimerMode, TimerSnapshot, TimerState, TimerStatus,
    DEFAULT_BREAK_SECS, DEFAULT_FOCUS_SECS,
};
