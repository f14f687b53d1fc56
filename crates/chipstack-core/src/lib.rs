//! # Chipstack Core Library
//!
//! Core logic for Chipstack, a gamified focus timer: run a timed session,
//! rate its quality, earn chips, climb ranks. Persistence, accounts and UI
//! live in the callers; this crate takes primitive values and returns
//! primitive results.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a countdown running on its own tokio task. Remaining
//!   time is always recomputed from a monotonic start instant, so delayed or
//!   skipped ticks never make it drift.
//! - **Scoring Engine**: pure functions turning (duration, quality rating)
//!   into chips and lifetime chip totals into ranks.
//! - **Config**: TOML configuration for session lengths, chip formula
//!   constants and the rank table.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: handle to the countdown worker
//! - [`TimerSession`]: the countdown state machine itself
//! - [`calculate_chips`] / [`get_rank`]: scoring entry points
//! - [`Config`]: application configuration management

pub mod config;
pub mod error;
pub mod scoring;
pub mod session_type;
pub mod timer;

pub use config::{data_dir, Config};
pub use error::{ConfigError, CoreError, ScoringError, TimerError};
pub use scoring::{
    award, calculate_chips, get_next_rank, get_progress_to_next_rank, get_rank, get_rank_name,
    get_rank_progress, max_chips_for_session, Award, ChipPolicy, ChipResult, Rank, RankProgress,
    RankTable, RankTransition,
};
pub use session_type::SessionType;
pub use timer::{
    TimerEngine, TimerEvent, TimerEvents, TimerMode, TimerSession, TimerSnapshot, TimerStatus,
};
