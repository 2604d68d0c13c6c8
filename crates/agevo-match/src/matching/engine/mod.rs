mod adjustments;
mod policy;
mod report;
mod rules;
mod weights;

pub use policy::{days_to_deadline, ConfidenceLevel, Priority, ScoreBand, NO_DEADLINE_DAYS};
pub use weights::{MatchWeights, MINIMUM_MATCH_SCORE};

use super::domain::{CompanyId, CompanyProfile, Grant, GrantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless scorer that applies the weight table to (company, grant) pairs.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    weights: MatchWeights,
}

impl MatchingEngine {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Score a single grant for a company as of `now`.
    pub fn score_one(
        &self,
        company: &CompanyProfile,
        grant: &Grant,
        now: DateTime<Utc>,
    ) -> MatchResult {
        let mut criteria = rules::score_criteria(company, grant, &self.weights);
        let days = grant
            .closing_date
            .map(|closing| policy::days_to_deadline(closing, now));

        criteria.score_details.bonus_score =
            adjustments::apply_bonuses(grant, days, &mut criteria, &self.weights);
        criteria.score_details.penalty_score =
            adjustments::apply_penalties(grant, &mut criteria, &self.weights);

        let raw_total = criteria.score_details.base_score()
            + f64::from(criteria.score_details.bonus_score)
            + f64::from(criteria.score_details.penalty_score);
        let total_score = raw_total.clamp(0.0, 100.0).round() as u8;

        let match_count = criteria.match_count();

        MatchResult {
            grant_id: grant.id.clone(),
            company_id: company.id.clone(),
            total_score,
            confidence_level: policy::confidence_for(match_count),
            estimated_success_rate: policy::estimated_success_rate(total_score, match_count),
            priority: policy::priority_for(total_score, days),
            criteria,
        }
    }

    /// Score every grant, drop results under [`MINIMUM_MATCH_SCORE`], and order the rest by
    /// descending score. Equal scores keep their input order.
    pub fn score_all(
        &self,
        company: &CompanyProfile,
        grants: &[Grant],
        now: DateTime<Utc>,
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = grants
            .iter()
            .map(|grant| self.score_one(company, grant, now))
            .filter(|result| result.total_score >= MINIMUM_MATCH_SCORE)
            .collect();

        results.sort_by(|a, b| b.total_score.cmp(&a.total_score));

        debug!(
            company_id = %company.id,
            evaluated = grants.len(),
            retained = results.len(),
            "scored grant catalog"
        );

        results
    }

    /// Plain-text breakdown of a single result.
    pub fn format_report(&self, result: &MatchResult, grant: &Grant) -> String {
        report::format_report(result, grant, &self.weights)
    }
}

/// Per-criterion contributions, including the capped bonus and penalty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub sector_score: f64,
    pub region_score: f64,
    pub size_score: f64,
    pub goal_score: f64,
    pub bonus_score: i16,
    pub penalty_score: i16,
}

impl ScoreDetails {
    pub fn base_score(&self) -> f64 {
        self.sector_score + self.region_score + self.size_score + self.goal_score
    }
}

/// Structured explanation attached to every result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    pub sector_match: bool,
    pub region_match: bool,
    pub size_match: bool,
    pub goal_match: bool,
    pub score_details: ScoreDetails,
    pub matching_features: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub suggestions: Vec<String>,
}

impl MatchCriteria {
    /// Number of criteria that earned full credit.
    pub fn match_count(&self) -> u8 {
        [
            self.sector_match,
            self.region_match,
            self.size_match,
            self.goal_match,
        ]
        .into_iter()
        .filter(|matched| *matched)
        .count() as u8
    }
}

/// Outcome of scoring one grant for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub grant_id: GrantId,
    pub company_id: CompanyId,
    pub total_score: u8,
    pub criteria: MatchCriteria,
    pub confidence_level: ConfidenceLevel,
    pub estimated_success_rate: u8,
    pub priority: Priority,
}

impl MatchResult {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.total_score)
    }
}
