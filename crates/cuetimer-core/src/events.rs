use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{CueKind, TimerConfiguration, TimerStatus};

/// Every state change in the engine produces an Event.
/// Front ends render from them; the cue sink is driven separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Ticked {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CueEmitted {
        kind: CueKind,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A committed edit replaced the configuration and reset the run.
    ConfigCommitted {
        config: TimerConfiguration,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        remaining_secs: u64,
        main_duration_secs: u64,
        get_ready_offset_secs: u64,
        get_ready_fired: bool,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The cue carried by this event, if any.
    pub fn cue_kind(&self) -> Option<CueKind> {
        match self {
            Event::CueEmitted { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
