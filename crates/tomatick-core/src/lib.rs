//! # tomatick Core Library
//!
//! The timer logic behind tomatick, a single-user Pomodoro timer. Presentation
//! layers (the `tomatick` CLI, or anything else) read snapshots and events
//! from here and forward user commands back in.
//!
//! ## Architecture
//!
//! - **Timer State Store**: [`TimerState`] holds mode, status, remaining time,
//!   session count, durations and preferences, and exposes plain mutations
//! - **Timer Engine**: [`TimerEngine`] drives the store through
//!   start/pause/reset and one-second ticks delivered by an injected
//!   [`TickScheduler`], reporting completion through a [`Notifier`]
//! - **Storage**: TOML-based configuration for durations and preferences;
//!   timer progress itself is memory-resident only
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Event`]: Every change the engine makes
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, NotifyError, ValidationError};
pub use events::Event;
pub use storage::{Config, DurationBounds};
pub use timer::{
    CompletionCue, ManualScheduler, Notifier, Preferences, RecordingNotifier, SilentNotifier,
    Theme, TickHandle, TickScheduler, TimerConfig, TimerEngine, TimerMode, TimerSnapshot,
    TimerState, TimerStatus,
};
