//! Countdown worker - owns the timer session and runs it on its own task.
//!
//! The worker receives commands over an mpsc channel, emits events over a
//! second channel and publishes a snapshot after every change. It is the
//! only code that touches the session, so the caller's task can stall for
//! any length of time without affecting the countdown.
//!
//! Channel send failures are logged, never fatal: a caller that stops
//! listening for events can still drive the timer and watch snapshots.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use super::events::{TimerCommand, TimerEvent, TimerSnapshot};
use super::session::TimerSession;

pub(crate) struct TimerWorker {
    commands: mpsc::UnboundedReceiver<TimerCommand>,
    events: mpsc::UnboundedSender<TimerEvent>,
    snapshots: watch::Sender<TimerSnapshot>,
    session: TimerSession,
    tick_interval: Duration,
    /// Present only while the session is running.
    ticker: Option<Interval>,
}

impl TimerWorker {
    pub(crate) fn new(
        commands: mpsc::UnboundedReceiver<TimerCommand>,
        events: mpsc::UnboundedSender<TimerEvent>,
        snapshots: watch::Sender<TimerSnapshot>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            commands,
            events,
            snapshots,
            session: TimerSession::new(),
            tick_interval,
            ticker: None,
        }
    }

    /// Process commands and ticks until every command sender is dropped.
    pub(crate) async fn run(mut self) {
        info!(tick_interval_ms = self.tick_interval.as_millis() as u64, "Timer worker starting");

        loop {
            tokio::select! {
                biased;

                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_tick(&mut self.ticker) => self.handle_tick(),
            }
        }

        info!(status = ?self.session.status(), "Timer worker stopped");
    }

    fn handle_command(&mut self, cmd: TimerCommand) {
        let now = Instant::now();
        match cmd {
            TimerCommand::Start {
                duration_secs,
                mode,
            } => {
                let events = self.session.start(duration_secs, mode, now);
                if !events.is_empty() {
                    info!(duration_secs, ?mode, "Timer started");
                    self.arm_ticker(now);
                }
                self.publish(events);
            }
            TimerCommand::Pause => {
                let event = self.session.pause(now);
                self.publish(event);
            }
            TimerCommand::Resume => {
                let events = self.session.resume(now);
                if !events.is_empty() {
                    self.arm_ticker(now);
                }
                self.publish(events);
            }
            TimerCommand::Stop => {
                let event = self.session.stop();
                self.publish(Some(event));
            }
            TimerCommand::Reset => {
                let event = self.session.reset();
                self.publish(Some(event));
            }
            TimerCommand::GetStatus { respond_to } => {
                // Caller may have given up waiting.
                let _ = respond_to.send(self.session.snapshot(now));
            }
        }
    }

    fn handle_tick(&mut self) {
        let events = self.session.tick(Instant::now());
        self.publish(events);
    }

    fn arm_ticker(&mut self, now: Instant) {
        let mut ticker = interval_at(now + self.tick_interval, self.tick_interval);
        // A stalled worker catches up with one tick, not a burst.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.ticker = Some(ticker);
    }

    fn publish(&mut self, events: impl IntoIterator<Item = TimerEvent>) {
        for event in events {
            if matches!(event, TimerEvent::Complete { .. }) {
                info!(mode = ?self.session.mode(), "Timer completed");
            }
            if self.events.send(event).is_err() {
                debug!("Event receiver dropped; event discarded");
            }
        }

        if !self.session.is_running() {
            self.ticker = None;
        }
        self.snapshots
            .send_replace(self.session.snapshot(Instant::now()));
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
