//! Countdown state machine.
//!
//! The session never counts ticks. Every query recomputes the remaining time
//! as `duration - (now - start_instant)` against a monotonic clock, so a tick
//! that arrives late, or not at all, cannot make the countdown drift.
//!
//! The caller passes `now` into every operation; the session itself never
//! reads the clock. [`TimerWorker`](super::worker::TimerWorker) supplies real
//! instants, tests supply synthetic ones.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> (Completed | Idle via stop)
//! Idle -> BreakRunning <-> BreakPaused -> (BreakCompleted | Idle via stop)
//! ```

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::events::{TimerEvent, TimerSnapshot};
use super::state::{TimerMode, TimerStatus};

#[derive(Debug, Clone)]
pub struct TimerSession {
    status: TimerStatus,
    mode: TimerMode,
    /// Length requested at start; fixed for the whole run.
    total_duration_secs: u64,
    /// Countdown budget measured from `start_instant`. Shrinks on resume by
    /// the time already spent before the pause.
    duration: Duration,
    /// Set while running.
    start_instant: Option<Instant>,
    /// Time elapsed since `start_instant` when the run was paused.
    elapsed_at_pause: Duration,
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerSession {
    pub fn new() -> Self {
        Self {
            status: TimerStatus::Idle,
            mode: TimerMode::Work,
            total_duration_secs: 0,
            duration: Duration::ZERO,
            start_instant: None,
            elapsed_at_pause: Duration::ZERO,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.total_duration_secs
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// Remaining time as of `now`, never negative.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.status {
            TimerStatus::Running | TimerStatus::BreakRunning => {
                let elapsed = self
                    .start_instant
                    .map(|start| now.saturating_duration_since(start))
                    .unwrap_or_default();
                self.duration.saturating_sub(elapsed)
            }
            TimerStatus::Paused | TimerStatus::BreakPaused => {
                self.duration.saturating_sub(self.elapsed_at_pause)
            }
            TimerStatus::Idle | TimerStatus::Completed | TimerStatus::BreakCompleted => {
                Duration::ZERO
            }
        }
    }

    pub fn snapshot(&self, now: Instant) -> TimerSnapshot {
        let remaining_seconds = match self.status {
            TimerStatus::Idle => 0,
            _ => ceil_secs(self.remaining(now)),
        };
        let total_seconds = if self.status.is_idle() {
            0
        } else {
            self.total_duration_secs
        };
        TimerSnapshot {
            status: self.status,
            mode: self.mode,
            total_seconds,
            remaining_seconds,
            elapsed_seconds: total_seconds.saturating_sub(remaining_seconds),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new run and return the immediate first tick.
    ///
    /// A zero duration is ignored. Starting over an active run discards it
    /// and starts from scratch, exactly as if the session had been idle.
    pub fn start(&mut self, duration_secs: u64, mode: TimerMode, now: Instant) -> Vec<TimerEvent> {
        if duration_secs == 0 {
            debug!(status = ?self.status, "ignoring start with zero duration");
            return Vec::new();
        }
        if !self.status.is_idle() {
            debug!(status = ?self.status, "start replaces the current run");
        }

        self.status = TimerStatus::running(mode);
        self.mode = mode;
        self.total_duration_secs = duration_secs;
        self.duration = Duration::from_secs(duration_secs);
        self.start_instant = Some(now);
        self.elapsed_at_pause = Duration::ZERO;
        self.tick(now)
    }

    /// Freeze a running countdown.
    ///
    /// A pause that lands after the deadline but before the next tick still
    /// pauses with zero remaining; completion is reported on `resume`.
    pub fn pause(&mut self, now: Instant) -> Option<TimerEvent> {
        if !self.status.is_running() {
            debug!(status = ?self.status, "ignoring pause");
            return None;
        }
        let elapsed = self
            .start_instant
            .take()
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        self.elapsed_at_pause = elapsed;
        self.status = TimerStatus::paused(self.mode);
        Some(TimerEvent::Paused {
            remaining_seconds: ceil_secs(self.duration.saturating_sub(elapsed)),
        })
    }

    /// Continue a paused run and return the immediate tick.
    ///
    /// Only valid after a pause that froze a nonzero amount of elapsed time.
    pub fn resume(&mut self, now: Instant) -> Vec<TimerEvent> {
        if !self.status.is_paused() || self.elapsed_at_pause.is_zero() {
            debug!(
                status = ?self.status,
                elapsed_at_pause_ms = self.elapsed_at_pause.as_millis() as u64,
                "ignoring resume"
            );
            return Vec::new();
        }
        self.duration = self.duration.saturating_sub(self.elapsed_at_pause);
        self.elapsed_at_pause = Duration::ZERO;
        self.start_instant = Some(now);
        self.status = TimerStatus::running(self.mode);
        self.tick(now)
    }

    /// Clear the run. Always reports `Stopped`, even when already idle.
    pub fn stop(&mut self) -> TimerEvent {
        if !self.status.is_idle() {
            debug!(status = ?self.status, "stopping timer");
        }
        *self = Self::new();
        TimerEvent::Stopped
    }

    pub fn reset(&mut self) -> TimerEvent {
        let event = self.stop();
        debug_assert!(self.status.is_idle());
        event
    }

    /// Recompute the remaining time. Returns nothing unless running.
    ///
    /// When the countdown reaches zero the session moves to its completed
    /// state and the returned events end with `Complete`. A completed
    /// session ignores further ticks, so completion is reported once.
    pub fn tick(&mut self, now: Instant) -> Vec<TimerEvent> {
        if !self.status.is_running() {
            return Vec::new();
        }

        let remaining = self.remaining(now);
        let remaining_ms = ceil_millis(remaining);
        let is_complete = remaining.is_zero();
        let mut events = vec![TimerEvent::Tick {
            remaining_seconds: remaining_ms.div_ceil(1000),
            remaining_ms,
            is_complete,
        }];

        if is_complete {
            self.start_instant = None;
            self.status = TimerStatus::completed(self.mode);
            events.push(TimerEvent::Complete { mode: self.mode });
        }
        events
    }
}

// ── Internal ─────────────────────────────────────────────────────────

fn ceil_millis(d: Duration) -> u64 {
    let millis = d.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn ceil_secs(d: Duration) -> u64 {
    ceil_millis(d).div_ceil(1000)
}
