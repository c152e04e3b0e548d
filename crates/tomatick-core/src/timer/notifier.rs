//! Completion notification port.

use serde::{Deserialize, Serialize};

use super::state::TimerMode;
use crate::error::NotifyError;

/// What just finished and what comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCue {
    pub completed: TimerMode,
    pub next: TimerMode,
    pub sessions_completed: u64,
}

/// Emits the audio cue on completion. Fire-and-forget: the engine logs
/// errors and otherwise ignores them.
pub trait Notifier {
    fn notify(&mut self, cue: &CompletionCue) -> Result<(), NotifyError>;
}

/// Drops every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&mut self, _cue: &CompletionCue) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Keeps every cue it receives. Optionally fails every call.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub cues: Vec<CompletionCue>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose backend is always missing.
    pub fn failing() -> Self {
        Self {
            cues: Vec::new(),
            fail: true,
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, cue: &CompletionCue) -> Result<(), NotifyError> {
        self.cues.push(*cue);
        if self.fail {
            return Err(NotifyError::Unavailable("no audio device".into()));
        }
        Ok(())
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, cue: &CompletionCue) -> Result<(), NotifyError> {
        (**self).notify(cue)
    }
}
