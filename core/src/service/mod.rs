//! Scheduler service - drives the scheduler's timer on the tokio runtime
//!
//! Architecture:
//! - SchedulerHandle: cloneable front for sending commands
//! - SchedulerService: background task owning the `Scheduler`, processing
//!   commands and sleeping until the pending play is due
//!
//! Only one sleep is ever outstanding. Whenever the scheduler replaces its
//! pending timer the deadline is re-derived from the new delay, so a
//! superseded timer can never fire.

mod handle;

pub use handle::SchedulerHandle;

use ads_types::{LogEntry, RunState, SchedulerSnapshot};
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::clock::Clock;
use crate::player::Player;
use crate::scheduler::{Scheduler, SchedulerError, TimerId};

// ─────────────────────────────────────────────────────────────────────────────
// Commands & Events
// ─────────────────────────────────────────────────────────────────────────────

/// Messages sent to the service from a `SchedulerHandle`
pub enum SchedulerCommand {
    ToggleSound {
        id: String,
        reply: oneshot::Sender<bool>,
    },
    ResetSelection,
    SetFrequency {
        minutes: i64,
        reply: oneshot::Sender<u8>,
    },
    SetVolume {
        percent: i64,
        reply: oneshot::Sender<u8>,
    },
    ResetSettings,
    TestPlay {
        id: String,
        reply: oneshot::Sender<Result<(), SchedulerError>>,
    },
    TestPlayEntry {
        index: usize,
        reply: oneshot::Sender<Result<(), SchedulerError>>,
    },
    Start {
        reply: oneshot::Sender<Result<(), SchedulerError>>,
    },
    Stop,
    ToggleRun {
        reply: oneshot::Sender<Result<RunState, SchedulerError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SchedulerSnapshot>,
    },
    Shutdown,
}

/// Updates sent to whoever renders the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    Played(LogEntry),
    RunStateChanged(RunState),
}

/// Sender handle for scheduler events
pub type EventSender = mpsc::Sender<SchedulerEvent>;

/// Create a new event channel
pub fn create_event_channel() -> (EventSender, mpsc::Receiver<SchedulerEvent>) {
    // Events are dropped rather than awaited when the buffer is full
    mpsc::channel(64)
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler Service
// ─────────────────────────────────────────────────────────────────────────────

/// Background task that owns the scheduler
pub struct SchedulerService<P, R, C> {
    scheduler: Scheduler<P, R, C>,
    cmd_rx: mpsc::Receiver<SchedulerCommand>,
    event_tx: Option<EventSender>,
    /// The timer the current sleep belongs to
    armed: Option<(TimerId, Instant)>,
}

impl<P, R, C> SchedulerService<P, R, C>
where
    P: Player,
    R: Rng,
    C: Clock,
{
    /// Create a new service and return a handle to communicate with it
    pub fn new(scheduler: Scheduler<P, R, C>) -> (Self, SchedulerHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let service = Self {
            scheduler,
            cmd_rx,
            event_tx: None,
            armed: None,
        };
        (service, SchedulerHandle::new(cmd_tx))
    }

    /// Publish plays and run state changes on `event_tx`
    pub fn with_events(mut self, event_tx: EventSender) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Run the service until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        tracing::debug!("Scheduler service started");
        loop {
            self.sync_deadline();
            let deadline = self.armed.map(|(_, at)| at).unwrap_or_else(Instant::now);

            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(SchedulerCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = tokio::time::sleep_until(deadline), if self.armed.is_some() => {
                    self.fire();
                }
            }
        }

        self.scheduler.stop();
        tracing::debug!("Scheduler service shut down");
    }

    /// Align the sleep deadline with the scheduler's pending timer
    fn sync_deadline(&mut self) {
        self.armed = match (self.armed, self.scheduler.pending()) {
            (Some((id, at)), Some(pending)) if id == pending.id => Some((id, at)),
            (_, Some(pending)) => Some((pending.id, Instant::now() + pending.delay)),
            (_, None) => None,
        };
    }

    fn fire(&mut self) {
        let Some((id, _)) = self.armed.take() else {
            return;
        };
        if let Some(entry) = self.scheduler.on_timer(id) {
            self.emit(SchedulerEvent::Played(entry));
        }
    }

    fn handle_command(&mut self, cmd: SchedulerCommand) {
        let before = self.scheduler.run_state();

        // Receivers may have given up waiting; the command still applies
        match cmd {
            SchedulerCommand::ToggleSound { id, reply } => {
                let _ = reply.send(self.scheduler.toggle_sound(&id));
            }
            SchedulerCommand::ResetSelection => self.scheduler.reset_selection(),
            SchedulerCommand::SetFrequency { minutes, reply } => {
                let _ = reply.send(self.scheduler.set_frequency(minutes));
            }
            SchedulerCommand::SetVolume { percent, reply } => {
                let _ = reply.send(self.scheduler.set_volume(percent));
            }
            SchedulerCommand::ResetSettings => self.scheduler.reset_settings(),
            SchedulerCommand::TestPlay { id, reply } => {
                let _ = reply.send(self.scheduler.test_play(&id));
            }
            SchedulerCommand::TestPlayEntry { index, reply } => {
                let _ = reply.send(self.scheduler.test_play_entry(index));
            }
            SchedulerCommand::Start { reply } => {
                let _ = reply.send(self.scheduler.start());
            }
            SchedulerCommand::Stop => self.scheduler.stop(),
            SchedulerCommand::ToggleRun { reply } => {
                let _ = reply.send(self.scheduler.toggle_run());
            }
            SchedulerCommand::Snapshot { reply } => {
                let _ = reply.send(self.scheduler.snapshot());
            }
            SchedulerCommand::Shutdown => {}
        }

        let after = self.scheduler.run_state();
        if before != after {
            self.emit(SchedulerEvent::RunStateChanged(after));
        }
    }

    fn emit(&self, event: SchedulerEvent) {
        let Some(tx) = &self.event_tx else {
            return;
        };
        if let Err(e) = tx.try_send(event) {
            tracing::debug!(error = %e, "Dropped scheduler event");
        }
    }
}

#[cfg(test)]
mod service_tests;
