//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine. It does not own a thread or a
//! timer: an injected [`ClockDriver`] is switched on while the engine is
//! `Running`, and whoever receives the clock's ticks calls `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle ──start──> Running ──pause──> Paused ──resume──> Running
//!                    │
//!                    └──tick (remaining hits 0)──> Completed ──start──> Running
//!
//! any ──commit_edit──> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(config, ManualClock::new(), RecordingSink::new());
//! engine.primary_action(); // Idle -> Running
//! // Once per second while running:
//! let events = engine.tick();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock::{ClockDriver, ManualClock};
use super::config::{EditDraft, TimerConfiguration};
use super::cue::{CueEvent, CueKind, CuePolicy, CueSink, NullSink};
use crate::events::Event;
use crate::storage::ConfigStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Countdown progress of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub status: TimerStatus,
    pub remaining_secs: u64,
    /// Guards at-most-once firing of the get-ready cue per run.
    pub get_ready_fired: bool,
}

impl TimerState {
    fn idle(config: &TimerConfiguration) -> Self {
        Self {
            status: TimerStatus::Idle,
            remaining_secs: config.main_duration_secs,
            get_ready_fired: false,
        }
    }
}

/// Core timer engine.
///
/// Owns the configuration and the countdown state exclusively. All mutation
/// goes through the command methods and `tick()`, each of which completes
/// its transition before returning.
pub struct TimerEngine<C: ClockDriver = ManualClock, S: CueSink = NullSink> {
    config: TimerConfiguration,
    state: TimerState,
    policy: CuePolicy,
    clock: C,
    sink: S,
    store: Option<Box<dyn ConfigStore + Send>>,
}

impl<C: ClockDriver, S: CueSink> TimerEngine<C, S> {
    /// Create an engine in the `Idle` state with a full countdown ready.
    pub fn new(config: TimerConfiguration, clock: C, sink: S) -> Self {
        Self {
            config,
            state: TimerState::idle(&config),
            policy: CuePolicy::default(),
            clock,
            sink,
            store: None,
        }
    }

    /// Create an engine from the stored configuration, falling back to the
    /// defaults when the store has nothing usable. Committed edits are
    /// written back to the same store.
    pub fn from_store(store: Box<dyn ConfigStore + Send>, clock: C, sink: S) -> Self {
        let config = match store.load() {
            Some(config) => config,
            None => {
                debug!("no stored configuration, using defaults");
                TimerConfiguration::default()
            }
        };
        Self::new(config, clock, sink).with_store(store)
    }

    pub fn with_store(mut self, store: Box<dyn ConfigStore + Send>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_cue_policy(mut self, policy: CuePolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn config(&self) -> &TimerConfiguration {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// 0.0 .. 1.0 fraction of the countdown elapsed.
    pub fn progress(&self) -> f64 {
        let total = self.config.main_duration_secs;
        if total == 0 {
            return if self.state.status == TimerStatus::Completed { 1.0 } else { 0.0 };
        }
        1.0 - (self.state.remaining_secs as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.state.status,
            remaining_secs: self.state.remaining_secs,
            main_duration_secs: self.config.main_duration_secs,
            get_ready_offset_secs: self.config.get_ready_offset_secs,
            get_ready_fired: self.state.get_ready_fired,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// The single start/pause/resume control.
    pub fn primary_action(&mut self) -> Vec<Event> {
        match self.state.status {
            TimerStatus::Idle | TimerStatus::Completed => self.start(),
            TimerStatus::Paused => self.resume().into_iter().collect(),
            TimerStatus::Running => self.pause().into_iter().collect(),
        }
    }

    /// Begin a fresh run from `Idle` or `Completed`. Empty otherwise.
    ///
    /// A zero-length countdown completes immediately without consuming a
    /// tick: the events are then `TimerStarted`, the `complete` cue and
    /// `TimerCompleted`, in that order.
    pub fn start(&mut self) -> Vec<Event> {
        match self.state.status {
            TimerStatus::Idle | TimerStatus::Completed => {
                self.state = TimerState {
                    status: TimerStatus::Running,
                    remaining_secs: self.config.main_duration_secs,
                    get_ready_fired: false,
                };
                info!(duration_secs = self.config.main_duration_secs, "timer started");
                let mut events = vec![Event::TimerStarted {
                    duration_secs: self.config.main_duration_secs,
                    at: Utc::now(),
                }];
                if self.state.remaining_secs == 0 {
                    self.complete(&mut events);
                } else {
                    self.clock.activate();
                }
                events
            }
            TimerStatus::Running | TimerStatus::Paused => Vec::new(),
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state.status {
            TimerStatus::Running => {
                self.clock.deactivate();
                self.state.status = TimerStatus::Paused;
                info!(remaining_secs = self.state.remaining_secs, "timer paused");
                Some(Event::TimerPaused {
                    remaining_secs: self.state.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.state.status {
            TimerStatus::Paused => {
                self.state.status = TimerStatus::Running;
                self.clock.activate();
                info!(remaining_secs = self.state.remaining_secs, "timer resumed");
                Some(Event::TimerResumed {
                    remaining_secs: self.state.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Advance the countdown by one second. Ignored unless `Running`.
    ///
    /// The get-ready cue fires on the tick that brings the remaining time to
    /// the configured offset, so it is always emitted before `complete`,
    /// including when the offset is 0 and both land on the final tick.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Running {
            debug!(status = ?self.state.status, "tick ignored");
            return Vec::new();
        }

        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        let remaining_secs = self.state.remaining_secs;
        let mut events = vec![Event::Ticked {
            remaining_secs,
            at: Utc::now(),
        }];

        if remaining_secs == self.config.get_ready_offset_secs && !self.state.get_ready_fired {
            self.state.get_ready_fired = true;
            events.push(self.emit_cue(CueKind::GetReady));
        }

        if remaining_secs == 0 {
            self.complete(&mut events);
        }
        events
    }

    /// Current configuration as edit-form values. No state changes.
    pub fn open_edit(&self) -> EditDraft {
        EditDraft::from_configuration(&self.config)
    }

    /// Apply a new configuration. Always stops the run and resets to `Idle`.
    pub fn commit_edit(&mut self, config: TimerConfiguration) -> Option<Event> {
        self.clock.deactivate();
        self.config = config;
        self.state = TimerState::idle(&config);
        info!(
            main_duration_secs = config.main_duration_secs,
            get_ready_offset_secs = config.get_ready_offset_secs,
            "configuration committed"
        );
        self.persist();
        Some(Event::ConfigCommitted {
            config,
            at: Utc::now(),
        })
    }

    /// Commit raw form input, clamping it first.
    pub fn commit_edit_form(
        &mut self,
        minutes: i64,
        seconds: i64,
        get_ready_minutes: i64,
        get_ready_seconds: i64,
    ) -> Option<Event> {
        let draft = EditDraft::clamped(minutes, seconds, get_ready_minutes, get_ready_seconds);
        self.commit_edit(draft.to_configuration())
    }

    /// Discard an open edit. Configuration and countdown are untouched.
    pub fn cancel_edit(&self) -> Option<Event> {
        debug!("edit cancelled");
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Terminal transition. Pushes the `complete` cue, then `TimerCompleted`.
    fn complete(&mut self, events: &mut Vec<Event>) {
        self.clock.deactivate();
        self.state.status = TimerStatus::Completed;
        self.state.remaining_secs = 0;
        events.push(self.emit_cue(CueKind::Complete));
        info!("timer completed");
        events.push(Event::TimerCompleted {
            duration_secs: self.config.main_duration_secs,
            at: Utc::now(),
        });
    }

    fn emit_cue(&mut self, kind: CueKind) -> Event {
        let cue = CueEvent::now(kind);
        let repeats = self.policy.repeats_for(kind);
        info!(cue = %kind, repeats, remaining_secs = self.state.remaining_secs, "cue emitted");
        if let Err(e) = self.sink.play(&cue, repeats) {
            warn!(cue = %kind, error = %e, "cue playback failed");
        }
        Event::CueEmitted {
            kind,
            remaining_secs: self.state.remaining_secs,
            at: cue.at,
        }
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.config) {
                warn!(error = %e, "failed to persist timer configuration");
            }
        }
    }
}

impl<C: ClockDriver + std::fmt::Debug, S: CueSink + std::fmt::Debug> std::fmt::Debug for TimerEngine<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("clock", &self.clock)
            .field("sink", &self.sink)
            .field("store", &self.store.is_some())
            .finish()
    }
}
