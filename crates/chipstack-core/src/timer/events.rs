use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use super::state::{TimerMode, TimerStatus};

/// Commands accepted by the countdown worker.
///
/// All commands are fire-and-forget except `GetStatus`. Commands that make
/// no sense in the current state are dropped without a reply.
#[derive(Debug)]
pub enum TimerCommand {
    Start { duration_secs: u64, mode: TimerMode },
    Pause,
    Resume,
    Stop,
    /// Stop and guarantee the worker ends up idle.
    Reset,
    GetStatus { respond_to: oneshot::Sender<TimerSnapshot> },
}

/// Notifications emitted by the countdown worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum TimerEvent {
    /// Remaining time, recomputed from the monotonic start instant.
    Tick {
        remaining_seconds: u64,
        remaining_ms: u64,
        is_complete: bool,
    },
    /// Countdown frozen; carries the remaining time at the moment of pausing.
    Paused { remaining_seconds: u64 },
    Stopped,
    /// Emitted exactly once per run.
    Complete { mode: TimerMode },
}

/// Point-in-time view of the worker's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub mode: TimerMode,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub elapsed_seconds: u64,
}

impl TimerSnapshot {
    pub const IDLE: TimerSnapshot = TimerSnapshot {
        status: TimerStatus::Idle,
        mode: TimerMode::Work,
        total_seconds: 0,
        remaining_seconds: 0,
        elapsed_seconds: 0,
    };
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::IDLE
    }
}
