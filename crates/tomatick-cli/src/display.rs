//! Plain-text rendering of snapshots and events.

use tomatick_core::{Event, Theme, TimerSnapshot, TimerStatus};

/// `MM:SS`, minutes unbounded.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn status_line(snap: &TimerSnapshot) -> String {
    let status = match snap.status {
        TimerStatus::Idle => "idle",
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
    };
    let theme = match snap.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    format!(
        "[{}] {} {} | sessions {} | theme {} | sound {}",
        snap.mode.as_str(),
        format_clock(snap.remaining_secs),
        status,
        snap.sessions_completed,
        theme,
        if snap.sound_enabled { "on" } else { "off" },
    )
}

pub fn describe(event: &Event) -> String {
    match event {
        Event::TimerStarted {
            mode,
            remaining_secs,
            ..
        } => format!("started {} at {}", mode.as_str(), format_clock(*remaining_secs)),
        Event::TimerResumed {
            mode,
            remaining_secs,
            ..
        } => format!("resumed {} at {}", mode.as_str(), format_clock(*remaining_secs)),
        Event::TimerPaused { remaining_secs, .. } => {
            format!("paused at {}", format_clock(*remaining_secs))
        }
        Event::TimerReset {
            mode,
            remaining_secs,
            ..
        } => format!("reset {} to {}", mode.as_str(), format_clock(*remaining_secs)),
        Event::TimerCompleted {
            completed,
            next,
            sessions_completed,
            ..
        } => format!(
            "{} complete, next: {} (sessions: {})",
            completed.as_str(),
            next.as_str(),
            sessions_completed
        ),
        Event::DurationChanged {
            mode,
            duration_secs,
            applied,
            ..
        } => format!(
            "{} duration set to {}{}",
            mode.as_str(),
            format_clock(*duration_secs),
            if *applied { "" } else { " (from next interval)" }
        ),
        Event::PreferenceChanged {
            theme,
            sound_enabled,
            ..
        } => format!(
            "theme {}, sound {}",
            if *theme == Theme::Dark { "dark" } else { "light" },
            if *sound_enabled { "on" } else { "off" }
        ),
        Event::StateSnapshot { snapshot, .. } => status_line(snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomatick_core::TimerState;

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1490), "24:50");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn status_line_for_fresh_state() {
        let line = status_line(&TimerState::default().snapshot());
        assert_eq!(line, "[focus] 25:00 idle | sessions 0 | theme light | sound on");
    }
}
