//! Clock drivers.
//!
//! A clock driver delivers one tick per second while it is active. The
//! engine activates it on entering `Running` and deactivates it on leaving.
//! Activation and deactivation are both idempotent.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Control surface the engine uses to start and stop tick delivery.
pub trait ClockDriver {
    fn activate(&mut self);
    fn deactivate(&mut self);
    fn is_active(&self) -> bool;
}

/// One elapsed second, stamped with the activation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Clock with no timer behind it. Ticks are delivered by calling
/// `TimerEngine::tick` directly, which keeps tests deterministic.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    active: bool,
    activations: u32,
    deactivations: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of inactive -> active transitions seen.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Number of active -> inactive transitions seen.
    pub fn deactivations(&self) -> u32 {
        self.deactivations
    }
}

impl ClockDriver for ManualClock {
    fn activate(&mut self) {
        if !self.active {
            self.active = true;
            self.activations += 1;
        }
    }

    fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            self.deactivations += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// 1 Hz clock backed by `tokio::time::interval`.
///
/// Ticks are sent on the channel returned from [`IntervalClock::new`]. Every
/// deactivation bumps the generation, so a tick already sitting in the
/// channel when `deactivate()` returns is recognisably stale and must be
/// dropped by the consumer (see [`IntervalClock::is_current`]).
///
/// `activate()` spawns onto the current tokio runtime and panics outside one.
#[derive(Debug)]
pub struct IntervalClock {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl IntervalClock {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let clock = Self {
            period,
            tx,
            generation: 0,
            task: None,
        };
        (clock, rx)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if `tick` was produced by the current activation.
    pub fn is_current(&self, tick: &Tick) -> bool {
        self.task.is_some() && tick.generation == self.generation
    }
}

impl ClockDriver for IntervalClock {
    fn activate(&mut self) {
        if self.task.is_some() {
            return;
        }
        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();
        debug!(generation, "clock activated");
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    fn deactivate(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.generation += 1;
            debug!(generation = self.generation, "clock deactivated");
        }
    }

    fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
