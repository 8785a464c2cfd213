use std::io::BufRead;

use cuetimer_core::timer::format_mm_ss;
use cuetimer_core::{CueKind, EditDraft, Event, IntervalClock, RunnerHandle, TimerEngine, TimerRunner, TomlConfigStore};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::warn;

use super::DurationOverrides;
use crate::sink::BellSink;

const HELP: &str = "[enter]/p start-pause-resume  e edit  e M S GM GS commit  c cancel  s status  q quit";

#[derive(Debug, PartialEq)]
enum Input {
    Primary,
    OpenEdit,
    Commit(EditDraft),
    Cancel,
    Status,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None | Some("p") => Input::Primary,
        Some("e") => {
            let fields: Vec<i64> = parts.filter_map(|p| p.parse().ok()).collect();
            match fields.as_slice() {
                [] => Input::OpenEdit,
                [m, s, gm, gs] => Input::Commit(EditDraft::clamped(*m, *s, *gm, *gs)),
                _ => Input::Unknown(line.to_string()),
            }
        }
        Some("c") => Input::Cancel,
        Some("s") => Input::Status,
        Some("q") => Input::Quit,
        Some(_) => Input::Unknown(line.to_string()),
    }
}

fn render(event: &Event) {
    match event {
        Event::TimerStarted { duration_secs, .. } => println!("started {}", format_mm_ss(*duration_secs)),
        Event::TimerPaused { remaining_secs, .. } => println!("paused at {}", format_mm_ss(*remaining_secs)),
        Event::TimerResumed { remaining_secs, .. } => println!("resumed at {}", format_mm_ss(*remaining_secs)),
        Event::Ticked { remaining_secs, .. } => println!("{}", format_mm_ss(*remaining_secs)),
        Event::CueEmitted { kind: CueKind::GetReady, .. } => println!("get ready!"),
        Event::CueEmitted { kind: CueKind::Complete, .. } => {}
        Event::TimerCompleted { .. } => println!("complete"),
        Event::ConfigCommitted { config, .. } => println!(
            "saved: {} with get-ready at {}",
            format_mm_ss(config.main_duration_secs),
            format_mm_ss(config.get_ready_offset_secs)
        ),
        Event::StateSnapshot { .. } => {}
    }
}

/// Read stdin on a plain thread so quitting never waits on a pending read.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn handle_input(handle: &RunnerHandle, input: Input) -> Result<bool, Box<dyn std::error::Error>> {
    match input {
        Input::Primary => handle.primary_action().await?,
        Input::OpenEdit => {
            let draft = handle.open_edit().await?;
            println!(
                "editing: e {} {} {} {}",
                draft.minutes, draft.seconds, draft.get_ready_minutes, draft.get_ready_seconds
            );
        }
        Input::Commit(draft) => handle.commit_edit(draft).await?,
        Input::Cancel => handle.cancel_edit().await?,
        Input::Status => {
            let snapshot = handle.snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Input::Quit => return Ok(false),
        Input::Unknown(line) => eprintln!("unknown input: {line}\n{HELP}"),
    }
    Ok(true)
}

pub async fn run(store: TomlConfigStore, durations: DurationOverrides) -> Result<(), Box<dyn std::error::Error>> {
    let stored = store.read_config_or_default();
    let config = durations.apply(stored.configuration());
    let (clock, ticks) = IntervalClock::new();
    let engine = TimerEngine::new(config, clock, BellSink::stderr())
        .with_store(Box::new(store))
        .with_cue_policy(stored.cues);

    let (runner, handle) = TimerRunner::with_engine(engine, ticks);
    let mut events = runner.subscribe();
    let task = tokio::spawn(runner.run());

    println!(
        "{} with get-ready at {}\n{HELP}",
        format_mm_ss(config.main_duration_secs),
        format_mm_ss(config.get_ready_offset_secs)
    );

    let mut lines = spawn_stdin_reader();
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                if !handle_input(&handle, parse_input(&line)).await? {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => render(&event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "display fell behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.shutdown().await?;
    task.await?;
    while let Ok(event) = events.try_recv() {
        render(&event);
    }
    Ok(())
}
