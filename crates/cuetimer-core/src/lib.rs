//! # cuetimer Core Library
//!
//! Core logic for an interval countdown timer with a secondary "get-ready"
//! cue point. The CLI binary is a thin host over this library; any other
//! front end drives the same engine through the same command surface.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine that owns the countdown and
//!   decides when cues fire
//! - **Clock Driver**: produces one tick per second while the engine is running
//! - **Cue Sink**: receives `get-ready` / `complete` cues and plays them
//! - **Storage**: TOML-backed store for the configured durations
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerRunner`]: Async loop serializing commands and ticks
//! - [`ConfigStore`]: Trait for durable configuration storage
//! - [`CueSink`]: Trait for audio/haptic feedback devices

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, CueError};
pub use events::Event;
pub use storage::{Config, ConfigStore, MemoryConfigStore, TomlConfigStore};
pub use timer::{
    ClockDriver, Command, CueEvent, CueKind, CuePolicy, CueSink, EditDraft, IntervalClock,
    ManualClock, NullSink, RecordingSink, RunnerHandle, Tick, TimerConfiguration, TimerEngine,
    TimerRunner, TimerState, TimerStatus,
};
