use cuetimer_core::{ManualClock, RecordingSink, TimerEngine, TimerStatus, TomlConfigStore};

use super::DurationOverrides;

/// Drive a full run on a manual clock, printing one JSON event per line.
pub fn run(store: TomlConfigStore, durations: DurationOverrides) -> Result<(), Box<dyn std::error::Error>> {
    let stored = store.read_config_or_default();
    let config = durations.apply(stored.configuration());
    let mut engine = TimerEngine::new(config, ManualClock::new(), RecordingSink::new()).with_cue_policy(stored.cues);

    for event in engine.start() {
        println!("{}", serde_json::to_string(&event)?);
    }
    while engine.status() == TimerStatus::Running {
        for event in engine.tick() {
            println!("{}", serde_json::to_string(&event)?);
        }
    }
    Ok(())
}
