//! Chip calculation for completed sessions.
//!
//! ```text
//! base_chips    = floor((duration_min / 25) * 100)
//! quality_bonus = quality_rating * 20
//! total_chips   = base_chips + quality_bonus
//! ```
//!
//! Sessions shorter than five minutes earn nothing, whatever the rating.
//!
//! | Duration | Rating | Base | Bonus | Total |
//! |----------|--------|------|-------|-------|
//! | 15 min   | 3      | 60   | 60    | 120   |
//! | 25 min   | 5      | 100  | 100   | 200   |
//! | 50 min   | 3      | 200  | 60    | 260   |

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::session_type::SessionType;

/// Lowest accepted quality rating.
pub const MIN_QUALITY_RATING: i64 = 1;
/// Highest accepted quality rating.
pub const MAX_QUALITY_RATING: i64 = 5;

/// Reward computed for one session. Not persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipResult {
    pub base_chips: u64,
    pub quality_bonus: u64,
    pub total_chips: u64,
}

impl ChipResult {
    /// The zero reward handed out below the duration floor.
    pub const ZERO: ChipResult = ChipResult {
        base_chips: 0,
        quality_bonus: 0,
        total_chips: 0,
    };
}

/// Constants of the chip formula.
///
/// [`ChipPolicy::standard`] is the reference behavior; other values are
/// configuration variants loaded from `[scoring]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipPolicy {
    /// Sessions strictly shorter than this earn zero chips.
    #[serde(default = "default_minimum_minutes")]
    pub minimum_minutes: u32,
    /// Duration that yields exactly `reference_chips` base chips.
    #[serde(default = "default_reference_minutes")]
    pub reference_minutes: u32,
    #[serde(default = "default_reference_chips")]
    pub reference_chips: u64,
    /// Bonus per quality star.
    #[serde(default = "default_bonus_per_star")]
    pub bonus_per_star: u64,
}

fn default_minimum_minutes() -> u32 {
    5
}
fn default_reference_minutes() -> u32 {
    25
}
fn default_reference_chips() -> u64 {
    100
}
fn default_bonus_per_star() -> u64 {
    20
}

impl Default for ChipPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl ChipPolicy {
    pub const fn standard() -> Self {
        Self {
            minimum_minutes: 5,
            reference_minutes: 25,
            reference_chips: 100,
            bonus_per_star: 20,
        }
    }

    /// Reject policies the formula cannot evaluate.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.reference_minutes == 0 {
            return Err(ScoringError::InvalidPolicy(
                "reference_minutes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Compute the reward for a session of `duration_minutes` rated
    /// `quality_rating` stars.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::NonFiniteDuration`] for NaN or infinite durations
    /// - [`ScoringError::NegativeDuration`] for durations below zero
    /// - [`ScoringError::QualityOutOfRange`] for ratings outside `1..=5`
    pub fn calculate(
        &self,
        duration_minutes: f64,
        quality_rating: i64,
    ) -> Result<ChipResult, ScoringError> {
        if !duration_minutes.is_finite() {
            return Err(ScoringError::NonFiniteDuration);
        }
        if duration_minutes < 0.0 {
            return Err(ScoringError::NegativeDuration {
                minutes: duration_minutes,
            });
        }
        if !(MIN_QUALITY_RATING..=MAX_QUALITY_RATING).contains(&quality_rating) {
            return Err(ScoringError::QualityOutOfRange {
                rating: quality_rating,
            });
        }

        if duration_minutes < f64::from(self.minimum_minutes) || self.reference_minutes == 0 {
            return Ok(ChipResult::ZERO);
        }

        // Divide first, then scale: 29 minutes floors to 115, not 116.
        let scaled = (duration_minutes / f64::from(self.reference_minutes))
            * self.reference_chips as f64;
        let base_chips = scaled.floor() as u64;
        let quality_bonus = (quality_rating as u64).saturating_mul(self.bonus_per_star);

        Ok(ChipResult {
            base_chips,
            quality_bonus,
            total_chips: base_chips.saturating_add(quality_bonus),
        })
    }

    /// Chips for a full-length session of `session_type` at the top rating.
    pub fn max_chips_for_session(&self, session_type: SessionType) -> u64 {
        self.max_chips_for_duration(session_type.default_duration_secs())
    }

    /// Chips for a session of `duration_secs` at the top rating.
    pub fn max_chips_for_duration(&self, duration_secs: u64) -> u64 {
        let minutes = duration_secs as f64 / 60.0;
        self.calculate(minutes, MAX_QUALITY_RATING)
            .map(|r| r.total_chips)
            .unwrap_or(0)
    }
}

/// Compute the reward for a session using the standard policy.
///
/// # Errors
///
/// See [`ChipPolicy::calculate`].
pub fn calculate_chips(duration_minutes: f64, quality_rating: i64) -> Result<ChipResult, ScoringError> {
    ChipPolicy::standard().calculate(duration_minutes, quality_rating)
}

/// Chips for a full-length session of `session_type` rated five stars.
pub fn max_chips_for_session(session_type: SessionType) -> u64 {
    ChipPolicy::standard().max_chips_for_session(session_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_examples() {
        assert_eq!(calculate_chips(25.0, 5).unwrap().total_chips, 200);
        assert_eq!(calculate_chips(15.0, 3).unwrap().total_chips, 120);
        assert_eq!(calculate_chips(50.0, 3).unwrap().total_chips, 260);
        assert_eq!(calculate_chips(5.0, 3).unwrap().total_chips, 80);
    }

    #[test]
    fn breakdown_splits_base_and_bonus() {
        let result = calculate_chips(15.0, 3).unwrap();
        assert_eq!(result.base_chips, 60);
        assert_eq!(result.quality_bonus, 60);
    }

    #[test]
    fn below_floor_earns_nothing() {
        for rating in 1..=5 {
            assert_eq!(calculate_chips(4.0, rating).unwrap(), ChipResult::ZERO);
            assert_eq!(calculate_chips(4.99, rating).unwrap(), ChipResult::ZERO);
            assert_eq!(calculate_chips(0.0, rating).unwrap(), ChipResult::ZERO);
        }
    }

    #[test]
    fn fractional_minutes_are_floored() {
        assert_eq!(calculate_chips(7.0, 1).unwrap().base_chips, 28);
        assert_eq!(calculate_chips(12.5, 1).unwrap().base_chips, 50);
        assert_eq!(calculate_chips(37.5, 1).unwrap().base_chips, 150);
    }

    #[test]
    fn base_chips_use_divide_then_scale_rounding() {
        // 29 / 25 * 100 lands just under 116 in f64.
        assert_eq!(calculate_chips(29.0, 1).unwrap().base_chips, 115);
        for minutes in [29.0f64, 57.0, 58.0, 113.0, 116.0] {
            let expected = ((minutes / 25.0) * 100.0).floor() as u64;
            assert_eq!(calculate_chips(minutes, 1).unwrap().base_chips, expected, "{minutes}");
        }
    }

    #[test]
    fn rejects_negative_duration() {
        assert_eq!(
            calculate_chips(-1.0, 3),
            Err(ScoringError::NegativeDuration { minutes: -1.0 })
        );
    }

    #[test]
    fn rejects_non_finite_duration() {
        assert_eq!(calculate_chips(f64::NAN, 3), Err(ScoringError::NonFiniteDuration));
        assert_eq!(calculate_chips(f64::INFINITY, 3), Err(ScoringError::NonFiniteDuration));
    }

    #[test]
    fn rejects_out_of_range_rating() {
        assert_eq!(
            calculate_chips(25.0, 0),
            Err(ScoringError::QualityOutOfRange { rating: 0 })
        );
        assert_eq!(
            calculate_chips(25.0, 6),
            Err(ScoringError::QualityOutOfRange { rating: 6 })
        );
        // Rating is checked even when the floor would zero the result.
        assert!(calculate_chips(2.0, 9).is_err());
    }

    #[test]
    fn max_chips_per_session_type() {
        assert_eq!(max_chips_for_session(SessionType::QuickHand), 160);
        assert_eq!(max_chips_for_session(SessionType::Standard), 200);
        assert_eq!(max_chips_for_session(SessionType::DeepStack), 300);
        assert_eq!(max_chips_for_session(SessionType::TestHand), 0);
        assert_eq!(ChipPolicy::standard().max_chips_for_duration(90 * 60), 460);
    }

    #[test]
    fn custom_policy_without_floor() {
        let policy = ChipPolicy {
            minimum_minutes: 0,
            ..ChipPolicy::standard()
        };
        let result = policy.calculate(1.0, 1).unwrap();
        assert_eq!(result.base_chips, 4);
        assert_eq!(result.total_chips, 24);
    }

    #[test]
    fn zero_reference_minutes_is_invalid() {
        let policy = ChipPolicy {
            reference_minutes: 0,
            ..ChipPolicy::standard()
        };
        assert!(policy.validate().is_err());
        assert_eq!(policy.calculate(30.0, 3).unwrap(), ChipResult::ZERO);
    }
}
