use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{CompanyId, CompanyProfile, CompanySubmission, Grant, GrantId};
use super::engine::{MatchResult, MatchingEngine, Priority, ScoreBand};
use super::intake::{IntakeGuard, ProfileViolation};
use super::repository::{
    BandGroup, MatchBoard, MatchRecord, MatchStore, MatchView, RepositoryError,
};

/// Service composing intake validation, the store, and the scoring engine.
pub struct MatchingService<S> {
    guard: IntakeGuard,
    store: Arc<S>,
    engine: Arc<MatchingEngine>,
}

static COMPANY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MATCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_company_id() -> CompanyId {
    let id = COMPANY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CompanyId(format!("cmp-{id:06}"))
}

fn next_match_id() -> String {
    let id = MATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("match-{id:06}")
}

/// Stored company together with its ranked matches.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub company: CompanyProfile,
    pub matches: Vec<MatchResult>,
}

impl<S> MatchingService<S>
where
    S: MatchStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_engine(store, MatchingEngine::default())
    }

    pub fn with_engine(store: Arc<S>, engine: MatchingEngine) -> Self {
        Self {
            guard: IntakeGuard,
            store,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    /// Validate and store a submission, score it against every active grant, and persist
    /// one match record per retained result.
    pub fn submit(
        &self,
        submission: CompanySubmission,
        now: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, MatchingServiceError> {
        let company = self
            .guard
            .profile_from_submission(submission, next_company_id(), now)
            .map_err(|violation| {
                warn!(%violation, "company submission rejected");
                violation
            })?;

        let company = self.store.insert_company(company)?;
        info!(
            company_id = %company.id,
            sector = company.sector.as_str(),
            "company profile stored"
        );

        let grants = self.store.active_grants()?;
        let matches = self.engine.score_all(&company, &grants, now);

        let records = matches
            .iter()
            .map(|result| MatchRecord::from_result(next_match_id(), result, now))
            .collect();
        // The company row is not rolled back when this write fails.
        if let Err(err) = self.store.insert_matches(records) {
            warn!(
                company_id = %company.id,
                error = %err,
                "company stored without its matches"
            );
            return Err(err.into());
        }

        info!(
            company_id = %company.id,
            evaluated = grants.len(),
            matches = matches.len(),
            "matches generated"
        );

        Ok(SubmissionOutcome { company, matches })
    }

    /// Stored matches for a company grouped by score band, optionally narrowed to one
    /// priority class.
    pub fn matches_for(
        &self,
        company_id: &CompanyId,
        priority: Option<Priority>,
    ) -> Result<MatchBoard, MatchingServiceError> {
        let company = self.company(company_id)?;
        let mut bands: BTreeMap<ScoreBand, Vec<MatchView>> = BTreeMap::new();
        let mut total = 0;

        for record in self.store.matches_for_company(company_id)? {
            if priority.is_some_and(|wanted| record.priority() != wanted) {
                continue;
            }

            let Some(grant) = self.store.fetch_grant(&record.grant_id)? else {
                warn!(
                    grant_id = %record.grant_id,
                    match_id = %record.id,
                    "match refers to an unknown grant"
                );
                continue;
            };

            total += 1;
            bands
                .entry(record.band())
                .or_default()
                .push(MatchView { record, grant });
        }

        let groups = bands
            .into_iter()
            .map(|(band, matches)| BandGroup {
                band,
                label: band.label(),
                matches,
            })
            .collect();

        Ok(MatchBoard {
            company,
            total,
            groups,
        })
    }

    /// Rescore one (company, grant) pair and render the plain-text report.
    pub fn report(
        &self,
        company_id: &CompanyId,
        grant_id: &GrantId,
        now: DateTime<Utc>,
    ) -> Result<String, MatchingServiceError> {
        let company = self.company(company_id)?;
        let grant = self
            .store
            .fetch_grant(grant_id)?
            .ok_or_else(|| MatchingServiceError::UnknownGrant(grant_id.clone()))?;

        let result = self.engine.score_one(&company, &grant, now);
        Ok(self.engine.format_report(&result, &grant))
    }

    pub fn active_grants(&self) -> Result<Vec<Grant>, MatchingServiceError> {
        Ok(self.store.active_grants()?)
    }

    fn company(&self, company_id: &CompanyId) -> Result<CompanyProfile, MatchingServiceError> {
        self.store
            .fetch_company(company_id)?
            .ok_or_else(|| MatchingServiceError::UnknownCompany(company_id.clone()))
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    Profile(#[from] ProfileViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("company '{0}' not found")]
    UnknownCompany(CompanyId),
    #[error("grant '{0}' not found")]
    UnknownGrant(GrantId),
}
