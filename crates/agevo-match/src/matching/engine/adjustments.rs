use super::super::domain::Grant;
use super::weights::{
    MatchWeights, HIGH_BUDGET_BONUS, HIGH_BUDGET_THRESHOLD, NO_MATCH_PENALTY,
    PERFECT_MATCH_BONUS, SINGLE_MATCH_PENALTY, SINGLE_SECTOR_PENALTY, URGENCY_BONUS,
    URGENCY_WINDOW_DAYS,
};
use super::MatchCriteria;

/// Stackable bonuses, capped at `weights.bonus_max`.
///
/// `days_to_deadline` is `None` when the grant has no closing date. Negative values (an
/// expired grant) still satisfy the urgency window.
pub(crate) fn apply_bonuses(
    grant: &Grant,
    days_to_deadline: Option<i64>,
    criteria: &mut MatchCriteria,
    weights: &MatchWeights,
) -> i16 {
    let mut bonus: i16 = 0;

    if criteria.match_count() == 4 {
        bonus += PERFECT_MATCH_BONUS;
        criteria
            .matching_features
            .push("Perfect match on every criterion".to_string());
    }

    if let Some(days) = days_to_deadline {
        if days <= URGENCY_WINDOW_DAYS {
            bonus += URGENCY_BONUS;
            criteria
                .matching_features
                .push("Grant closing soon".to_string());
        }
    }

    if grant.max_amount > HIGH_BUDGET_THRESHOLD {
        bonus += HIGH_BUDGET_BONUS;
        criteria
            .matching_features
            .push("High budget available".to_string());
    }

    bonus.min(weights.bonus_max)
}

/// Count-based and specificity penalties. The sources are summed first and the total is
/// floored once at `weights.penalty_max`.
pub(crate) fn apply_penalties(
    grant: &Grant,
    criteria: &mut MatchCriteria,
    weights: &MatchWeights,
) -> i16 {
    let mut penalty: i16 = 0;

    match criteria.match_count() {
        0 => {
            penalty += NO_MATCH_PENALTY;
            criteria
                .missing_requirements
                .push("No main criterion satisfied".to_string());
        }
        1 => {
            penalty += SINGLE_MATCH_PENALTY;
            criteria
                .suggestions
                .push("Only one criterion satisfied, the application will be difficult".to_string());
        }
        _ => {}
    }

    if grant.eligible_sectors.len() == 1 && !criteria.sector_match {
        penalty += SINGLE_SECTOR_PENALTY;
        criteria
            .missing_requirements
            .push("Grant is restricted to a single sector".to_string());
    }

    penalty.max(weights.penalty_max)
}
