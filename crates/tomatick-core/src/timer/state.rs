//! Timer state store.
//!
//! [`TimerState`] is the single source of truth for one timer: mode, status,
//! remaining time, session count, configured durations and preferences.
//! Every operation here is a plain mutation with no scheduling or side
//! effects. Transition legality is enforced by the engine, not here.

use serde::{Deserialize, Serialize};

/// Default Focus interval length.
pub const DEFAULT_FOCUS_SECS: u64 = 25 * 60;
/// Default Break interval length.
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Focus,
    Break,
}

impl TimerMode {
    /// The mode entered after this one completes.
    pub fn next(self) -> Self {
        match self {
            TimerMode::Focus => TimerMode::Break,
            TimerMode::Break => TimerMode::Focus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::Break => "break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Configured interval lengths, in seconds. Both must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub focus_duration_secs: u64,
    pub break_duration_secs: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_duration_secs: DEFAULT_FOCUS_SECS,
            break_duration_secs: DEFAULT_BREAK_SECS,
        }
    }
}

impl TimerConfig {
    pub fn duration_for(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Focus => self.focus_duration_secs,
            TimerMode::Break => self.break_duration_secs,
        }
    }
}

/// Side-channel preferences. They never affect countdown correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            sound_enabled: true,
        }
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub status: TimerStatus,
    pub remaining_secs: u64,
    pub sessions_completed: u64,
    pub focus_duration_secs: u64,
    pub break_duration_secs: u64,
    pub theme: Theme,
    pub sound_enabled: bool,
}

/// All state for one timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    mode: TimerMode,
    status: TimerStatus,
    remaining_secs: u64,
    sessions_completed: u64,
    config: TimerConfig,
    preferences: Preferences,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerConfig::default(), Preferences::default())
    }
}

impl TimerState {
    /// Fresh state: Focus, Idle, full focus duration, no sessions.
    pub fn new(config: TimerConfig, preferences: Preferences) -> Self {
        debug_assert!(config.focus_duration_secs > 0 && config.break_duration_secs > 0);
        Self {
            mode: TimerMode::Focus,
            status: TimerStatus::Idle,
            remaining_secs: config.focus_duration_secs,
            sessions_completed: 0,
            config,
            preferences,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn duration_for(&self, mode: TimerMode) -> u64 {
        self.config.duration_for(mode)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            status: self.status,
            remaining_secs: self.remaining_secs,
            sessions_completed: self.sessions_completed,
            focus_duration_secs: self.config.focus_duration_secs,
            break_duration_secs: self.config.break_duration_secs,
            theme: self.preferences.theme,
            sound_enabled: self.preferences.sound_enabled,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Overwrite remaining time. Callers bound it to the mode's duration.
    pub fn set_remaining(&mut self, secs: u64) {
        self.remaining_secs = secs;
    }

    /// Switch mode and re-seed remaining time with the full duration.
    pub fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.remaining_secs = self.config.duration_for(mode);
    }

    pub fn set_status(&mut self, status: TimerStatus) {
        self.status = status;
    }

    pub fn increment_sessions_completed(&mut self) {
        self.sessions_completed += 1;
    }

    pub fn set_focus_duration(&mut self, secs: u64) {
        self.set_duration(TimerMode::Focus, secs);
    }

    pub fn set_break_duration(&mut self, secs: u64) {
        self.set_duration(TimerMode::Break, secs);
    }

    /// Store a new duration. The countdown is only re-seeded when `mode` is
    /// active and Idle; a running or paused countdown keeps its value until
    /// the mode is next entered.
    fn set_duration(&mut self, mode: TimerMode, secs: u64) {
        debug_assert!(secs > 0, "durations must be positive");
        match mode {
            TimerMode::Focus => self.config.focus_duration_secs = secs,
            TimerMode::Break => self.config.break_duration_secs = secs,
        }
        if self.mode == mode && self.status == TimerStatus::Idle {
            self.remaining_secs = secs;
        }
    }

    pub fn toggle_theme(&mut self) {
        self.preferences.theme = self.preferences.theme.toggled();
    }

    pub fn toggle_sound(&mut self) {
        self.preferences.sound_enabled = !self.preferences.sound_enabled;
    }
}
