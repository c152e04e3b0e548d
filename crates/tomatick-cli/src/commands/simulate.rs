use clap::Args;
use tomatick_core::{
    Config, Event, ManualScheduler, RecordingNotifier, TimerConfig, TimerEngine, TimerState,
};

use crate::display;

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of one-second ticks to deliver
    #[arg(long, default_value = "0")]
    ticks: u64,
    /// Focus length in seconds (defaults to the configured value)
    #[arg(long)]
    focus_secs: Option<u64>,
    /// Break length in seconds (defaults to the configured value)
    #[arg(long)]
    break_secs: Option<u64>,
    /// Pause after this many ticks; the remaining ticks are not delivered
    #[arg(long)]
    pause_after: Option<u64>,
    /// Start the next interval after each completion
    #[arg(long)]
    continuous: bool,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

fn emit(event: &Event, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{}", display::describe(event));
    }
    Ok(())
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let configured = config.timer_config()?;
    let timer = TimerConfig {
        focus_duration_secs: args.focus_secs.unwrap_or(configured.focus_duration_secs),
        break_duration_secs: args.break_secs.unwrap_or(configured.break_duration_secs),
    };
    if timer.focus_duration_secs == 0 || timer.break_duration_secs == 0 {
        return Err("durations must be positive".into());
    }

    let mut engine = TimerEngine::new(
        TimerState::new(timer, config.preferences()),
        ManualScheduler::new(),
        RecordingNotifier::new(),
    );

    if let Some(event) = engine.start() {
        emit(&event, args.json)?;
    }

    for delivered in 0..args.ticks {
        if args.pause_after == Some(delivered) {
            if let Some(event) = engine.pause() {
                emit(&event, args.json)?;
            }
        }
        let Some(handle) = engine.active_tick() else {
            continue;
        };
        if let Some(event) = engine.on_tick(handle) {
            emit(&event, args.json)?;
            if args.continuous {
                if let Some(event) = engine.start() {
                    emit(&event, args.json)?;
                }
            }
        }
    }

    tracing::debug!(cues = engine.notifier().cues.len(), "simulation finished");
    emit(&engine.snapshot_event(), args.json)?;
    Ok(())
}
