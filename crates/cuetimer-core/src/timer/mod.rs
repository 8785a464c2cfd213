mod clock;
mod config;
mod cue;
mod engine;
mod runner;

pub use clock::{ClockDriver, IntervalClock, ManualClock, Tick};
pub use config::{
    format_mm_ss, parse_mm_ss, EditDraft, TimerConfiguration, DEFAULT_GET_READY_SECS,
    DEFAULT_MAIN_SECS,
};
pub use cue::{CueEvent, CueKind, CuePolicy, CueSink, NullSink, RecordingSink};
pub use engine::{TimerEngine, TimerState, TimerStatus};
pub use runner::{Command, RunnerHandle, TimerRunner};
