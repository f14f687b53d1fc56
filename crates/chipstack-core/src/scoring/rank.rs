//! Rank progression driven by lifetime chips earned.
//!
//! Ranks depend on the lifetime total, never on the current balance. The
//! table is ordered by strictly increasing `min_chips`, starts at zero and
//! has no upper bound: the last rank absorbs everything at or above its
//! threshold.
//!
//! Negative totals never come from a well-formed caller; they are treated as
//! zero instead of being rejected.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::chips::ChipResult;
use crate::error::ScoringError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub name: String,
    pub min_chips: u64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub emoji: String,
}

impl Rank {
    pub fn new(name: &str, min_chips: u64, color: &str, emoji: &str) -> Self {
        Self {
            name: name.into(),
            min_chips,
            color: color.into(),
            emoji: emoji.into(),
        }
    }
}

/// Where a lifetime total sits inside its tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankProgress<'a> {
    pub current_rank: &'a Rank,
    pub next_rank: Option<&'a Rank>,
    /// Zero at the top rank.
    pub chips_to_next_rank: u64,
    /// Whole percent through the current tier, `0..=100`.
    pub progress_percent: u8,
}

/// Rank before and after a lifetime total changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankTransition<'a> {
    pub from: &'a Rank,
    pub to: &'a Rank,
    pub promoted: bool,
}

/// Outcome of crediting a session reward to a lifetime total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Award<'a> {
    pub chips: ChipResult,
    pub previous_lifetime_total: u64,
    pub new_lifetime_total: u64,
    pub transition: RankTransition<'a>,
}

/// Validated, ordered rank table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankTable {
    ranks: Vec<Rank>,
}

impl RankTable {
    /// Build a table, checking the ordering invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidRankTable`] if the table is empty, the
    /// first threshold is not zero, or thresholds are not strictly
    /// increasing.
    pub fn new(ranks: Vec<Rank>) -> Result<Self, ScoringError> {
        let first = ranks
            .first()
            .ok_or_else(|| ScoringError::InvalidRankTable("table is empty".into()))?;
        if first.min_chips != 0 {
            return Err(ScoringError::InvalidRankTable(format!(
                "first rank '{}' must start at 0 chips, not {}",
                first.name, first.min_chips
            )));
        }
        if let Some(pair) = ranks.windows(2).find(|w| w[1].min_chips <= w[0].min_chips) {
            return Err(ScoringError::InvalidRankTable(format!(
                "rank '{}' ({}) must require more chips than '{}' ({})",
                pair[1].name, pair[1].min_chips, pair[0].name, pair[0].min_chips
            )));
        }
        Ok(Self { ranks })
    }

    /// The twelve-tier reference table, Fish through GOAT.
    pub fn standard() -> &'static RankTable {
        static STANDARD: OnceLock<RankTable> = OnceLock::new();
        STANDARD.get_or_init(|| RankTable {
            ranks: vec![
                Rank::new("Fish", 0, "#06b6d4", "🐟"),
                Rank::new("Calling Station", 500, "#ec4899", "📞"),
                Rank::new("ABC", 1_000, "#fde047", "🎯"),
                Rank::new("TAG Regular", 2_000, "#a855f7", "🃏"),
                Rank::new("Semi Pro", 5_000, "#f97316", "🎰"),
                Rank::new("Grinder", 10_000, "#22c55e", "⚙️"),
                Rank::new("Shark", 20_000, "#3b82f6", "🦈"),
                Rank::new("Pro", 50_000, "#64748b", "💎"),
                Rank::new("High Roller", 100_000, "#ef4444", "🎲"),
                Rank::new("Champion", 250_000, "#ffffff", "🏆"),
                Rank::new("Legend", 500_000, "#84cc16", "👑"),
                Rank::new("GOAT", 1_000_000, "#fbbf24", "🐐"),
            ],
        })
    }

    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn base_rank(&self) -> &Rank {
        &self.ranks[0]
    }

    pub fn max_rank(&self) -> &Rank {
        &self.ranks[self.ranks.len() - 1]
    }

    fn index_for(&self, total_chips_earned: i64) -> usize {
        let total = normalize(total_chips_earned);
        // First threshold is 0, so at least one rank always qualifies.
        self.ranks
            .partition_point(|r| r.min_chips <= total)
            .saturating_sub(1)
    }

    /// Highest rank whose threshold is at or below the total.
    pub fn rank_for(&self, total_chips_earned: i64) -> &Rank {
        &self.ranks[self.index_for(total_chips_earned)]
    }

    /// Rank immediately above the current one, `None` at the top.
    pub fn next_rank(&self, total_chips_earned: i64) -> Option<&Rank> {
        self.ranks.get(self.index_for(total_chips_earned) + 1)
    }

    /// Percent through the current tier, clamped to `0.0..=100.0`.
    /// Always `100.0` at the top rank.
    pub fn progress_to_next(&self, total_chips_earned: i64) -> f64 {
        let current = self.rank_for(total_chips_earned);
        let Some(next) = self.next_rank(total_chips_earned) else {
            return 100.0;
        };
        let in_tier = total_chips_earned as f64 - current.min_chips as f64;
        let tier_range = (next.min_chips - current.min_chips) as f64;
        (in_tier / tier_range * 100.0).clamp(0.0, 100.0)
    }

    pub fn progress(&self, total_chips_earned: i64) -> RankProgress<'_> {
        let total = normalize(total_chips_earned);
        let current_rank = self.rank_for(total_chips_earned);
        match self.next_rank(total_chips_earned) {
            None => RankProgress {
                current_rank,
                next_rank: None,
                chips_to_next_rank: 0,
                progress_percent: 100,
            },
            Some(next) => {
                let in_tier = u128::from(total - current_rank.min_chips);
                let tier_range = u128::from(next.min_chips - current_rank.min_chips);
                let percent = (in_tier * 100 / tier_range).min(100) as u8;
                RankProgress {
                    current_rank,
                    next_rank: Some(next),
                    chips_to_next_rank: next.min_chips - total,
                    progress_percent: percent,
                }
            }
        }
    }

    pub fn transition(&self, before: i64, after: i64) -> RankTransition<'_> {
        let from_idx = self.index_for(before);
        let to_idx = self.index_for(after);
        RankTransition {
            from: &self.ranks[from_idx],
            to: &self.ranks[to_idx],
            promoted: to_idx > from_idx,
        }
    }

    /// Credit `chips` to `lifetime_total` and report the rank change.
    ///
    /// The caller persists the new total; the sum saturates rather than
    /// wrapping.
    pub fn award(&self, lifetime_total: u64, chips: ChipResult) -> Award<'_> {
        let new_total = lifetime_total.saturating_add(chips.total_chips);
        Award {
            chips,
            previous_lifetime_total: lifetime_total,
            new_lifetime_total: new_total,
            transition: self.transition(clamp_to_i64(lifetime_total), clamp_to_i64(new_total)),
        }
    }
}

fn normalize(total_chips_earned: i64) -> u64 {
    total_chips_earned.max(0) as u64
}

fn clamp_to_i64(total: u64) -> i64 {
    i64::try_from(total).unwrap_or(i64::MAX)
}

/// Rank for a lifetime total in the standard table.
pub fn get_rank(total_chips_earned: i64) -> &'static Rank {
    RankTable::standard().rank_for(total_chips_earned)
}

pub fn get_rank_name(total_chips_earned: i64) -> &'static str {
    &get_rank(total_chips_earned).name
}

pub fn get_next_rank(total_chips_earned: i64) -> Option<&'static Rank> {
    RankTable::standard().next_rank(total_chips_earned)
}

pub fn get_progress_to_next_rank(total_chips_earned: i64) -> f64 {
    RankTable::standard().progress_to_next(total_chips_earned)
}

pub fn get_rank_progress(total_chips_earned: i64) -> RankProgress<'static> {
    RankTable::standard().progress(total_chips_earned)
}

/// Credit a session reward against the standard table.
pub fn award(lifetime_total: u64, chips: ChipResult) -> Award<'static> {
    RankTable::standard().award(lifetime_total, chips)
}
