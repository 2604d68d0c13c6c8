//! Company-to-grant matching: profile intake, catalog import, scoring, persistence
//! contracts, the orchestrating service, and its HTTP router.

pub mod catalog;
pub mod domain;
pub mod engine;
pub(crate) mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogImportError, GrantCatalog};
pub use domain::{
    CompanyId, CompanyProfile, CompanySize, CompanySubmission, ContributionType, Grant,
    GrantId, GrantStatus, GrantValidationError, InvestmentGoal, RawGrant, Region, Sector,
    UnknownValue,
};
pub use engine::{
    days_to_deadline, ConfidenceLevel, MatchCriteria, MatchResult, MatchWeights,
    MatchingEngine, Priority, ScoreBand, ScoreDetails, MINIMUM_MATCH_SCORE, NO_DEADLINE_DAYS,
};
pub use intake::{IntakeGuard, ProfileViolation};
pub use repository::{
    BandGroup, CompanyRepository, GrantRepository, MatchBoard, MatchReasons, MatchRecord,
    MatchRepository, MatchStore, MatchView, RepositoryError,
};
pub use router::matching_router;
pub use service::{MatchingService, MatchingServiceError, SubmissionOutcome};
