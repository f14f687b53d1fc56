use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerMode {
    Work,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
    BreakRunning,
    BreakPaused,
    BreakCompleted,
}

impl TimerStatus {
    pub(crate) fn running(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Work => TimerStatus::Running,
            TimerMode::Break => TimerStatus::BreakRunning,
        }
    }

    pub(crate) fn paused(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Work => TimerStatus::Paused,
            TimerMode::Break => TimerStatus::BreakPaused,
        }
    }

    pub(crate) fn completed(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Work => TimerStatus::Completed,
            TimerMode::Break => TimerStatus::BreakCompleted,
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, TimerStatus::Running | TimerStatus::BreakRunning)
    }

    pub fn is_paused(self) -> bool {
        matches!(self, TimerStatus::Paused | TimerStatus::BreakPaused)
    }

    pub fn is_completed(self) -> bool {
        matches!(self, TimerStatus::Completed | TimerStatus::BreakCompleted)
    }

    pub fn is_idle(self) -> bool {
        self == TimerStatus::Idle
    }
}
