//! Cue events and the sinks that play them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CueKind {
    GetReady,
    Complete,
}

impl CueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CueKind::GetReady => "get-ready",
            CueKind::Complete => "complete",
        }
    }
}

impl std::fmt::Display for CueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueEvent {
    pub kind: CueKind,
    pub at: DateTime<Utc>,
}

impl CueEvent {
    pub fn now(kind: CueKind) -> Self {
        Self { kind, at: Utc::now() }
    }
}

/// How many times the sink should repeat each cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuePolicy {
    #[serde(default = "default_repeats")]
    pub get_ready_repeats: u32,
    #[serde(default = "default_repeats")]
    pub complete_repeats: u32,
}

fn default_repeats() -> u32 {
    1
}

impl Default for CuePolicy {
    fn default() -> Self {
        Self {
            get_ready_repeats: default_repeats(),
            complete_repeats: default_repeats(),
        }
    }
}

impl CuePolicy {
    pub fn repeats_for(&self, kind: CueKind) -> u32 {
        match kind {
            CueKind::GetReady => self.get_ready_repeats,
            CueKind::Complete => self.complete_repeats,
        }
    }
}

/// Audio/haptic output. Playback failures are reported back but never
/// change engine state.
pub trait CueSink {
    fn play(&mut self, cue: &CueEvent, repeats: u32) -> Result<(), CueError>;
}

impl<T: CueSink + ?Sized> CueSink for Box<T> {
    fn play(&mut self, cue: &CueEvent, repeats: u32) -> Result<(), CueError> {
        (**self).play(cue, repeats)
    }
}

/// Sink that discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CueSink for NullSink {
    fn play(&mut self, _cue: &CueEvent, _repeats: u32) -> Result<(), CueError> {
        Ok(())
    }
}

/// Sink that keeps every cue it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    played: Vec<(CueEvent, u32)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[(CueEvent, u32)] {
        &self.played
    }

    pub fn kinds(&self) -> Vec<CueKind> {
        self.played.iter().map(|(cue, _)| cue.kind).collect()
    }

    pub fn count(&self, kind: CueKind) -> usize {
        self.played.iter().filter(|(cue, _)| cue.kind == kind).count()
    }
}

impl CueSink for RecordingSink {
    fn play(&mut self, cue: &CueEvent, repeats: u32) -> Result<(), CueError> {
        self.played.push((cue.clone(), repeats));
        Ok(())
    }
}
