use serde::{Deserialize, Serialize};

/// Criterion weights and adjustment caps used by the scoring engine.
///
/// Base weights sum to 100, so a full match already reaches the score ceiling before any
/// bonus is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub sector: f64,
    pub region: f64,
    pub size: f64,
    pub goal: f64,
    pub bonus_max: i16,
    pub penalty_max: i16,
}

impl MatchWeights {
    pub const STANDARD: MatchWeights = MatchWeights {
        sector: 35.0,
        region: 25.0,
        size: 20.0,
        goal: 20.0,
        bonus_max: 10,
        penalty_max: -20,
    };

    pub fn base_total(&self) -> f64 {
        self.sector + self.region + self.size + self.goal
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Share of the criterion weight awarded when a fallback heuristic applies.
pub(crate) const SECTOR_PARTIAL_RATIO: f64 = 0.3;
pub(crate) const REGION_PARTIAL_RATIO: f64 = 0.5;
pub(crate) const SIZE_PARTIAL_RATIO: f64 = 0.4;
pub(crate) const GOAL_PARTIAL_RATIO: f64 = 0.5;

/// A generic "services" company gets sector credit only from grants listing more sectors than this.
pub(crate) const BROAD_SECTOR_LIST: usize = 3;
/// Grants covering more regions than this are treated as national.
pub(crate) const NATIONAL_REGION_LIST: usize = 10;

pub(crate) const PERFECT_MATCH_BONUS: i16 = 5;
pub(crate) const URGENCY_BONUS: i16 = 3;
pub(crate) const HIGH_BUDGET_BONUS: i16 = 2;
pub(crate) const URGENCY_WINDOW_DAYS: i64 = 15;
pub(crate) const HIGH_BUDGET_THRESHOLD: u64 = 50_000;

pub(crate) const NO_MATCH_PENALTY: i16 = -10;
pub(crate) const SINGLE_MATCH_PENALTY: i16 = -5;
pub(crate) const SINGLE_SECTOR_PENALTY: i16 = -5;

/// Results below this score are not worth presenting.
pub const MINIMUM_MATCH_SCORE: u8 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_weights_sum_to_one_hundred() {
        assert_eq!(MatchWeights::STANDARD.base_total(), 100.0);
        assert_eq!(MatchWeights::default(), MatchWeights::STANDARD);
    }

    #[test]
    fn bonus_sources_fit_within_the_cap() {
        let stacked = PERFECT_MATCH_BONUS + URGENCY_BONUS + HIGH_BUDGET_BONUS;
        assert!(stacked <= MatchWeights::STANDARD.bonus_max);
    }
}
