//! Client interface for the countdown worker.
//!
//! [`TimerEngine`] is a cheap-to-clone handle. Commands are fire-and-forget:
//! the handle never blocks and never reports invalid transitions. Results
//! arrive on [`TimerEvents`]; the current state is always readable through
//! [`TimerEngine::snapshot`].
//!
//! ## Usage
//!
//! ```ignore
//! let (timer, mut events) = TimerEngine::spawn(Duration::from_millis(100))?;
//! timer.start(25 * 60);
//! let finished = events.until_complete(|event| render(event)).await;
//! ```

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;

use super::events::{TimerCommand, TimerEvent, TimerSnapshot};
use super::state::{TimerMode, TimerStatus};
use super::worker::TimerWorker;
use crate::error::TimerError;

/// Fastest tick the worker will schedule.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Slowest tick the worker will schedule.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_TICK_INTERVAL: Duration = MIN_TICK_INTERVAL;

#[derive(Debug, Clone)]
pub struct TimerEngine {
    commands: mpsc::UnboundedSender<TimerCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
}

impl TimerEngine {
    /// Spawn a countdown worker on the current tokio runtime.
    ///
    /// `tick_interval` only affects how often progress is reported, not
    /// accuracy; it is clamped to 100ms..=1s.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Initialization`] when called outside a tokio
    /// runtime. There is no synchronous fallback.
    pub fn spawn(tick_interval: Duration) -> Result<(TimerEngine, TimerEvents), TimerError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| TimerError::Initialization(e.to_string()))?;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::IDLE);

        let tick_interval = tick_interval.clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL);
        let worker = TimerWorker::new(cmd_rx, event_tx, snapshot_tx, tick_interval);
        runtime.spawn(worker.run());

        Ok((
            TimerEngine {
                commands: cmd_tx,
                snapshots: snapshot_rx,
            },
            TimerEvents { receiver: event_rx },
        ))
    }

    /// Start a work session.
    pub fn start(&self, duration_secs: u64) {
        self.start_with_mode(duration_secs, TimerMode::Work);
    }

    pub fn start_break(&self, duration_secs: u64) {
        self.start_with_mode(duration_secs, TimerMode::Break);
    }

    pub fn start_with_mode(&self, duration_secs: u64, mode: TimerMode) {
        self.send(TimerCommand::Start {
            duration_secs,
            mode,
        });
    }

    pub fn pause(&self) {
        self.send(TimerCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(TimerCommand::Resume);
    }

    pub fn stop(&self) {
        self.send(TimerCommand::Stop);
    }

    pub fn reset(&self) {
        self.send(TimerCommand::Reset);
    }

    /// Latest snapshot published by the worker.
    pub fn snapshot(&self) -> TimerSnapshot {
        *self.snapshots.borrow()
    }

    pub fn status(&self) -> TimerStatus {
        self.snapshots.borrow().status
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }

    /// Ask the worker for a snapshot computed right now, rather than at the
    /// last tick. Falls back to the last published snapshot if the worker
    /// has shut down.
    pub async fn query_status(&self) -> TimerSnapshot {
        let (tx, rx) = oneshot::channel();
        if self
            .commands
            .send(TimerCommand::GetStatus { respond_to: tx })
            .is_err()
        {
            return self.snapshot();
        }
        rx.await.unwrap_or_else(|_| self.snapshot())
    }

    fn send(&self, cmd: TimerCommand) {
        if let Err(err) = self.commands.send(cmd) {
            warn!(command = ?err.0, "Timer worker is gone; command dropped");
        }
    }
}

/// Receiving side of the worker's event channel.
#[derive(Debug)]
pub struct TimerEvents {
    receiver: mpsc::UnboundedReceiver<TimerEvent>,
}

impl TimerEvents {
    /// Next event, or `None` once the worker has shut down.
    pub async fn recv(&mut self) -> Option<TimerEvent> {
        self.receiver.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<TimerEvent> {
        self.receiver.try_recv().ok()
    }

    /// Feed every event to `on_event` until the run ends.
    ///
    /// Returns the mode of the run on `Complete`, or `None` if it was
    /// stopped or the worker went away first.
    pub async fn until_complete<F>(&mut self, mut on_event: F) -> Option<TimerMode>
    where
        F: FnMut(&TimerEvent),
    {
        while let Some(event) = self.receiver.recv().await {
            on_event(&event);
            match event {
                TimerEvent::Complete { mode } => return Some(mode),
                TimerEvent::Stopped => return None,
                _ => {}
            }
        }
        None
    }
}
