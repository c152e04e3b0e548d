//! Completion cue for terminals: bell, desktop notification, system sound.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use notify_rust::Notification;
use tomatick_core::{CompletionCue, Notifier, NotifyError, TimerMode};

const SOUND_PLAYERS: [(&str, &str); 3] = [
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/generic.wav"),
];

/// Rings the terminal bell and, unless disabled, raises a desktop
/// notification and plays the first system sound found.
pub struct TerminalNotifier {
    desktop: bool,
}

impl TerminalNotifier {
    pub fn new(desktop: bool) -> Self {
        Self { desktop }
    }
}

fn message(cue: &CompletionCue) -> (&'static str, String) {
    match cue.completed {
        TimerMode::Focus => (
            "Break time",
            format!(
                "Focus session {} done. Take a break.",
                cue.sessions_completed
            ),
        ),
        TimerMode::Break => ("Back to focus", "Break is over.".to_string()),
    }
}

fn play_system_sound() -> bool {
    let Some((player, file)) = SOUND_PLAYERS
        .iter()
        .find(|(_, file)| Path::new(file).exists())
    else {
        return false;
    };
    spawn_reaped(
        Command::new(player)
            .arg(file)
            .stdout(Stdio::null())
            .stderr(Stdio::null()),
    )
    .is_some()
}

/// Spawn `cmd` and wait for it on a detached thread so the child never
/// lingers as a zombie. Returns `None` when the program can't be started.
fn spawn_reaped(cmd: &mut Command) -> Option<JoinHandle<()>> {
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::debug!(error = %err, "failed to start sound player");
            return None;
        }
    };
    Some(std::thread::spawn(move || {
        if let Err(err) = child.wait() {
            tracing::debug!(error = %err, "sound player wait failed");
        }
    }))
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, cue: &CompletionCue) -> Result<(), NotifyError> {
        let mut stderr = std::io::stderr();
        let bell = stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .is_ok();

        if !self.desktop {
            return if bell {
                Ok(())
            } else {
                Err(NotifyError::Unavailable("terminal bell".into()))
            };
        }

        let (summary, body) = message(cue);
        if let Err(err) = Notification::new()
            .summary(summary)
            .body(&body)
            .appname("tomatick")
            .icon("alarm-clock")
            .show()
        {
            tracing::debug!(error = %err, "desktop notification failed");
        }

        if play_system_sound() || bell {
            Ok(())
        } else {
            Err(NotifyError::Failed("no sound player or terminal bell".into()))
        }
    }
}
