use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CompanyId, CompanyProfile, Grant, GrantId};
use super::engine::{ConfidenceLevel, MatchResult, Priority, ScoreBand, ScoreDetails};

/// Explanation payload persisted next to every match, flattened from [`MatchResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReasons {
    pub sector_match: bool,
    pub region_match: bool,
    pub size_match: bool,
    pub goal_match: bool,
    pub score_details: ScoreDetails,
    pub matching_features: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub suggestions: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    pub estimated_success_rate: u8,
    pub priority: Priority,
}

/// Stored association between a company and one grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub company_id: CompanyId,
    pub grant_id: GrantId,
    pub match_score: u8,
    pub match_reasons: MatchReasons,
    pub viewed: bool,
    pub saved: bool,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn from_result(id: String, result: &MatchResult, created_at: DateTime<Utc>) -> Self {
        let criteria = &result.criteria;
        Self {
            id,
            company_id: result.company_id.clone(),
            grant_id: result.grant_id.clone(),
            match_score: result.total_score,
            match_reasons: MatchReasons {
                sector_match: criteria.sector_match,
                region_match: criteria.region_match,
                size_match: criteria.size_match,
                goal_match: criteria.goal_match,
                score_details: criteria.score_details.clone(),
                matching_features: criteria.matching_features.clone(),
                missing_requirements: criteria.missing_requirements.clone(),
                suggestions: criteria.suggestions.clone(),
                confidence_level: result.confidence_level,
                estimated_success_rate: result.estimated_success_rate,
                priority: result.priority,
            },
            viewed: false,
            saved: false,
            created_at,
        }
    }

    pub fn priority(&self) -> Priority {
        self.match_reasons.priority
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.match_score)
    }
}

/// Company profile storage.
pub trait CompanyRepository: Send + Sync {
    fn insert_company(&self, company: CompanyProfile) -> Result<CompanyProfile, RepositoryError>;
    fn fetch_company(&self, id: &CompanyId) -> Result<Option<CompanyProfile>, RepositoryError>;
}

/// Read access to the grant catalog.
pub trait GrantRepository: Send + Sync {
    /// Grants with status `active`, in catalog order.
    fn active_grants(&self) -> Result<Vec<Grant>, RepositoryError>;
    fn fetch_grant(&self, id: &GrantId) -> Result<Option<Grant>, RepositoryError>;
}

/// Match persistence.
pub trait MatchRepository: Send + Sync {
    fn insert_matches(&self, records: Vec<MatchRecord>) -> Result<(), RepositoryError>;
    /// Stored matches for a company, highest score first.
    fn matches_for_company(&self, id: &CompanyId) -> Result<Vec<MatchRecord>, RepositoryError>;
}

/// Everything the matching service needs from storage.
pub trait MatchStore: CompanyRepository + GrantRepository + MatchRepository {}

impl<T> MatchStore for T where T: CompanyRepository + GrantRepository + MatchRepository {}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Stored match joined with the grant it refers to.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub grant: Grant,
}

/// Matches sharing a [`ScoreBand`].
#[derive(Debug, Clone, Serialize)]
pub struct BandGroup {
    pub band: ScoreBand,
    pub label: &'static str,
    pub matches: Vec<MatchView>,
}

/// A company's matches grouped by band, best band first. Empty bands are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct MatchBoard {
    pub company: CompanyProfile,
    pub total: usize,
    pub groups: Vec<BandGroup>,
}

impl MatchBoard {
    pub fn matches(&self) -> impl Iterator<Item = &MatchView> {
        self.groups.iter().flat_map(|group| group.matches.iter())
    }
}
