//! Named session presets.
//!
//! The timer itself is duration-agnostic: a preset is resolved to a plain
//! number of seconds (through [`SessionsConfig`](crate::config::SessionsConfig)
//! when the user has overridden the defaults) before it reaches the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    QuickHand,
    Standard,
    DeepStack,
    /// Ten-second session for trying the flow end to end.
    TestHand,
}

impl SessionType {
    pub const ALL: [SessionType; 4] = [
        SessionType::QuickHand,
        SessionType::Standard,
        SessionType::DeepStack,
        SessionType::TestHand,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SessionType::QuickHand => "Quick Hand",
            SessionType::Standard => "Standard Hand",
            SessionType::DeepStack => "Deep Stack",
            SessionType::TestHand => "Test Hand",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SessionType::QuickHand => "Quick focus burst",
            SessionType::Standard => "Classic Pomodoro",
            SessionType::DeepStack => "Deep work session",
            SessionType::TestHand => "Ten-second dry run",
        }
    }

    /// Built-in length of the preset.
    pub fn default_duration_secs(self) -> u64 {
        match self {
            SessionType::QuickHand => 15 * 60,
            SessionType::Standard => 25 * 60,
            SessionType::DeepStack => 50 * 60,
            SessionType::TestHand => 10,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "quick" | "quick_hand" => Ok(SessionType::QuickHand),
            "standard" => Ok(SessionType::Standard),
            "deep" | "deep_stack" => Ok(SessionType::DeepStack),
            "test" | "test_hand" => Ok(SessionType::TestHand),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}
