use std::io::Write;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tomatick_core::{Config, DurationBounds, Event, TimerEngine, TimerState};

use crate::display;
use crate::notifier::TerminalNotifier;
use crate::scheduler::TokioScheduler;

const HELP: &str = "commands: s start | p pause | r reset | f <min> focus | b <min> break | t theme | m sound | ? status | q quit";

#[derive(Args)]
pub struct RunArgs {
    /// Focus length in minutes (1-60)
    #[arg(long)]
    focus: Option<u64>,
    /// Break length in minutes (1-30)
    #[arg(long = "break")]
    break_minutes: Option<u64>,
    /// Start with the completion sound off
    #[arg(long)]
    no_sound: bool,
    /// Only ring the terminal bell on completion
    #[arg(long)]
    no_desktop: bool,
    /// Start the first focus interval right away
    #[arg(long)]
    autostart: bool,
}

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Pause,
    Reset,
    FocusSecs(u64),
    BreakSecs(u64),
    ToggleTheme,
    ToggleSound,
    Status,
    Help,
    Quit,
}

fn parse_minutes(arg: Option<&str>, bounds: DurationBounds) -> Result<u64, String> {
    let raw = arg.ok_or_else(|| format!("{} needs a number of minutes", bounds.field))?;
    let minutes = raw
        .parse::<u64>()
        .map_err(|_| format!("'{raw}' is not a number of minutes"))?;
    bounds.validate(minutes).map_err(|e| e.to_string())
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let cmd = match head {
        "s" | "start" => Command::Start,
        "p" | "pause" => Command::Pause,
        "r" | "reset" => Command::Reset,
        "f" | "focus" => Command::FocusSecs(parse_minutes(parts.next(), DurationBounds::FOCUS)?),
        "b" | "break" => Command::BreakSecs(parse_minutes(parts.next(), DurationBounds::BREAK)?),
        "t" | "theme" => Command::ToggleTheme,
        "m" | "sound" => Command::ToggleSound,
        "?" | "status" => Command::Status,
        "h" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (h for help)")),
    };
    Ok(Some(cmd))
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    config.validate()?;
    let mut timer = config.timer_config()?;
    if let Some(minutes) = args.focus {
        timer.focus_duration_secs = DurationBounds::FOCUS.validate(minutes)?;
    }
    if let Some(minutes) = args.break_minutes {
        timer.break_duration_secs = DurationBounds::BREAK.validate(minutes)?;
    }
    let mut preferences = config.preferences();
    if args.no_sound {
        preferences.sound_enabled = false;
    }

    let state = TimerState::new(timer, preferences);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(session(
        state,
        config.tick_interval(),
        TerminalNotifier::new(!args.no_desktop),
        args.autostart,
    ))
}

fn print_event(event: &Event) {
    println!("\r\x1b[K{}", display::describe(event));
}

fn print_status<S, N>(engine: &TimerEngine<S, N>)
where
    S: tomatick_core::TickScheduler,
    N: tomatick_core::Notifier,
{
    print!("\r\x1b[K{}", display::status_line(&engine.snapshot()));
    let _ = std::io::stdout().flush();
}

async fn session(
    state: TimerState,
    interval: Duration,
    notifier: TerminalNotifier,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut ticks) = TokioScheduler::new();
    let mut engine = TimerEngine::with_interval(state, scheduler, notifier, interval);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    if autostart {
        if let Some(event) = engine.start() {
            print_event(&event);
        }
    }
    print_status(&engine);

    loop {
        tokio::select! {
            Some(handle) = ticks.recv() => {
                if let Some(event) = engine.on_tick(handle) {
                    print_event(&event);
                }
                print_status(&engine);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let event = match parse_command(&line) {
                    Ok(None) => None,
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Start)) => engine.start(),
                    Ok(Some(Command::Pause)) => engine.pause(),
                    Ok(Some(Command::Reset)) => engine.reset(),
                    Ok(Some(Command::FocusSecs(secs))) => engine.set_focus_duration(secs),
                    Ok(Some(Command::BreakSecs(secs))) => engine.set_break_duration(secs),
                    Ok(Some(Command::ToggleTheme)) => engine.toggle_theme(),
                    Ok(Some(Command::ToggleSound)) => engine.toggle_sound(),
                    Ok(Some(Command::Status)) => Some(engine.snapshot_event()),
                    Ok(Some(Command::Help)) => {
                        println!("\r\x1b[K{HELP}");
                        None
                    }
                    Err(message) => {
                        println!("\r\x1b[K{message}");
                        None
                    }
                };
                if let Some(event) = event {
                    print_event(&event);
                }
                print_status(&engine);
            }
        }
    }

    println!();
    tracing::info!(
        sessions_completed = engine.state().sessions_completed(),
        "session ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_letter_commands() {
        assert_eq!(parse_command("s"), Ok(Some(Command::Start)));
        assert_eq!(parse_command(" pause "), Ok(Some(Command::Pause)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn duration_commands_convert_to_seconds() {
        assert_eq!(parse_command("f 30"), Ok(Some(Command::FocusSecs(1800))));
        assert_eq!(parse_command("break 10"), Ok(Some(Command::BreakSecs(600))));
    }

    #[test]
    fn duration_commands_enforce_bounds() {
        assert!(parse_command("f 61").is_err());
        assert!(parse_command("b 0").is_err());
        assert!(parse_command("b 31").is_err());
        assert!(parse_command("f").is_err());
        assert!(parse_command("f ten").is_err());
    }

    #[test]
    fn unknown_command_is_reported() {
        assert!(parse_command("x").unwrap_err().contains("unknown command"));
    }
}
