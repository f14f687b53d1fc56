//! Scoring engine: converts a completed session into chips and maps lifetime
//! chip totals onto ranks.
//!
//! Everything here is pure and synchronous, so it can be called from any
//! number of threads without coordination.

mod chips;
mod rank;

pub use chips::{
    calculate_chips, max_chips_for_session, ChipPolicy, ChipResult, MAX_QUALITY_RATING,
    MIN_QUALITY_RATING,
};
pub use rank::{
    award, get_next_rank, get_progress_to_next_rank, get_rank, get_rank_name, get_rank_progress,
    Award, Rank, RankProgress, RankTable, RankTransition,
};
