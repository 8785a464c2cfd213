//! Async host loop for a [`TimerEngine`].
//!
//! Commands from any number of [`RunnerHandle`]s and ticks from the
//! [`IntervalClock`] are funnelled through one `select!` loop, so the engine
//! only ever sees one message at a time and needs no locking.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use super::clock::{ClockDriver, IntervalClock, Tick};
use super::config::{EditDraft, TimerConfiguration};
use super::cue::CueSink;
use super::engine::TimerEngine;
use crate::error::{CoreError, Result};
use crate::events::Event;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

#[derive(Debug)]
pub enum Command {
    PrimaryAction,
    Pause,
    OpenEdit(oneshot::Sender<EditDraft>),
    CommitEdit(EditDraft),
    CancelEdit,
    Snapshot(oneshot::Sender<Event>),
    Shutdown,
}

/// Cloneable command sender for a running [`TimerRunner`].
#[derive(Debug, Clone)]
pub struct RunnerHandle {
    tx: mpsc::Sender<Command>,
}

impl RunnerHandle {
    pub async fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).await.map_err(|_| CoreError::RunnerStopped)
    }

    pub async fn primary_action(&self) -> Result<()> {
        self.send(Command::PrimaryAction).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(Command::Pause).await
    }

    pub async fn open_edit(&self) -> Result<EditDraft> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::OpenEdit(tx)).await?;
        rx.await.map_err(|_| CoreError::RunnerStopped)
    }

    pub async fn commit_edit(&self, draft: EditDraft) -> Result<()> {
        self.send(Command::CommitEdit(draft)).await
    }

    pub async fn cancel_edit(&self) -> Result<()> {
        self.send(Command::CancelEdit).await
    }

    pub async fn snapshot(&self) -> Result<Event> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx)).await?;
        rx.await.map_err(|_| CoreError::RunnerStopped)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }
}

pub struct TimerRunner<S: CueSink> {
    engine: TimerEngine<IntervalClock, S>,
    ticks: mpsc::UnboundedReceiver<Tick>,
    commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Event>,
}

impl<S: CueSink> TimerRunner<S> {
    /// Runner over a fresh engine with a 1 Hz clock.
    pub fn new(config: TimerConfiguration, sink: S) -> (Self, RunnerHandle) {
        let (clock, ticks) = IntervalClock::new();
        Self::with_engine(TimerEngine::new(config, clock, sink), ticks)
    }

    /// Runner over a prepared engine. `ticks` must be the receiver paired
    /// with the engine's clock.
    pub fn with_engine(
        engine: TimerEngine<IntervalClock, S>,
        ticks: mpsc::UnboundedReceiver<Tick>,
    ) -> (Self, RunnerHandle) {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let runner = Self {
            engine,
            ticks,
            commands,
            events,
        };
        (runner, RunnerHandle { tx })
    }

    /// Every event the engine produces from here on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Process commands and ticks until `Shutdown` or until every handle
    /// is dropped. Returns the engine for inspection.
    pub async fn run(mut self) -> TimerEngine<IntervalClock, S> {
        info!("timer runner started");
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                Some(tick) = self.ticks.recv() => self.on_tick(tick),
            }
        }
        self.engine.clock_mut().deactivate();
        info!("timer runner stopped");
        self.engine
    }

    fn apply(&mut self, command: Command) {
        debug!(?command, "command received");
        let events = match command {
            Command::PrimaryAction => self.engine.primary_action(),
            Command::Pause => self.engine.pause().into_iter().collect(),
            Command::OpenEdit(reply) => {
                let _ = reply.send(self.engine.open_edit());
                Vec::new()
            }
            Command::CommitEdit(draft) => self.engine.commit_edit(draft.to_configuration()).into_iter().collect(),
            Command::CancelEdit => self.engine.cancel_edit().into_iter().collect(),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.engine.snapshot());
                Vec::new()
            }
            Command::Shutdown => Vec::new(),
        };
        for event in events {
            self.publish(event);
        }
    }

    fn on_tick(&mut self, tick: Tick) {
        if !self.engine.clock().is_current(&tick) {
            debug!(generation = tick.generation, "dropping stale tick");
            return;
        }
        for event in self.engine.tick() {
            self.publish(event);
        }
    }

    fn publish(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
