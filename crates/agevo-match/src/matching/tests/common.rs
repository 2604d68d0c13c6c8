use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::matching::domain::{
    CompanyId, CompanyProfile, CompanySize, CompanySubmission, ContributionType, Grant, GrantId,
    GrantStatus, InvestmentGoal, Region, Sector,
};
use crate::matching::repository::{
    CompanyRepository, GrantRepository, MatchRecord, MatchRepository, RepositoryError,
};
use crate::matching::{matching_router, MatchingService};

/// Fixed clock: 2026-10-16 12:00 UTC.
pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn company(
    sector: Sector,
    region: Region,
    company_size: CompanySize,
    investment_goal: InvestmentGoal,
) -> CompanyProfile {
    CompanyProfile {
        id: CompanyId("cmp-test".to_string()),
        company_name: "Officine Rossi S.r.l.".to_string(),
        first_name: "Giulia".to_string(),
        last_name: "Rossi".to_string(),
        email: "giulia@officinerossi.it".to_string(),
        sector,
        region,
        company_size,
        investment_goal,
        created_at: now(),
    }
}

/// Small tech company in Lombardia looking to digitalize.
pub(super) fn tech_company() -> CompanyProfile {
    company(
        Sector::Tech,
        Region::Lombardia,
        CompanySize::Small,
        InvestmentGoal::Digitalization,
    )
}

/// Grant fully matching [`tech_company`], worth up to 100k and closing in 10 days.
pub(super) fn grant(id: &str) -> Grant {
    Grant {
        id: GrantId(id.to_string()),
        title: "Voucher Digitalizzazione".to_string(),
        description: "Contributi per la trasformazione digitale".to_string(),
        ente_erogatore: "Regione Lombardia".to_string(),
        contribution_type: ContributionType::FondoPerduto,
        min_amount: 5_000,
        max_amount: 100_000,
        eligible_sectors: vec![Sector::Tech, Sector::Manufacturing],
        eligible_regions: vec![Region::Lombardia],
        eligible_company_sizes: vec![CompanySize::Small],
        eligible_investment_goals: vec![InvestmentGoal::Digitalization],
        opening_date: Some(date(2026, 1, 1)),
        closing_date: Some(date(2026, 10, 26)),
        status: GrantStatus::Active,
        official_url: None,
    }
}

/// Grant none of whose criteria fit [`tech_company`].
pub(super) fn unrelated_grant(id: &str) -> Grant {
    Grant {
        eligible_sectors: vec![Sector::Food, Sector::Agriculture],
        eligible_regions: vec![Region::Sicilia, Region::Puglia],
        eligible_company_sizes: vec![CompanySize::Large],
        eligible_investment_goals: vec![InvestmentGoal::Training],
        max_amount: 20_000,
        closing_date: None,
        ..grant(id)
    }
}

pub(super) fn submission() -> CompanySubmission {
    CompanySubmission {
        company_name: "  Officine Rossi S.r.l. ".to_string(),
        first_name: "Giulia".to_string(),
        last_name: "Rossi".to_string(),
        email: "Giulia@OfficineRossi.it".to_string(),
        sector: Sector::Tech,
        region: Region::Lombardia,
        company_size: CompanySize::Small,
        investment_goal: InvestmentGoal::Digitalization,
    }
}

pub(super) fn build_service(grants: Vec<Grant>) -> (MatchingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_grants(grants));
    let service = MatchingService::new(store.clone());
    (service, store)
}

pub(super) fn router_with_service(service: Arc<MatchingService<MemoryStore>>) -> axum::Router {
    matching_router(service)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) companies: Mutex<HashMap<CompanyId, CompanyProfile>>,
    pub(super) grants: Vec<Grant>,
    pub(super) matches: Mutex<Vec<MatchRecord>>,
    pub(super) reject_match_writes: bool,
}

impl MemoryStore {
    pub(super) fn with_grants(grants: Vec<Grant>) -> Self {
        Self {
            grants,
            ..Self::default()
        }
    }

    pub(super) fn stored_matches(&self) -> Vec<MatchRecord> {
        self.matches.lock().expect("match mutex poisoned").clone()
    }
}

impl CompanyRepository for MemoryStore {
    fn insert_company(&self, company: CompanyProfile) -> Result<CompanyProfile, RepositoryError> {
        let mut guard = self.companies.lock().expect("company mutex poisoned");
        if guard.contains_key(&company.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn fetch_company(&self, id: &CompanyId) -> Result<Option<CompanyProfile>, RepositoryError> {
        let guard = self.companies.lock().expect("company mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

impl GrantRepository for MemoryStore {
    fn active_grants(&self) -> Result<Vec<Grant>, RepositoryError> {
        Ok(self
            .grants
            .iter()
            .filter(|grant| grant.is_active())
            .cloned()
            .collect())
    }

    fn fetch_grant(&self, id: &GrantId) -> Result<Option<Grant>, RepositoryError> {
        Ok(self.grants.iter().find(|grant| &grant.id == id).cloned())
    }
}

impl MatchRepository for MemoryStore {
    fn insert_matches(&self, records: Vec<MatchRecord>) -> Result<(), RepositoryError> {
        if self.reject_match_writes {
            return Err(RepositoryError::Unavailable("match table locked".to_string()));
        }
        self.matches
            .lock()
            .expect("match mutex poisoned")
            .extend(records);
        Ok(())
    }

    fn matches_for_company(&self, id: &CompanyId) -> Result<Vec<MatchRecord>, RepositoryError> {
        let mut records: Vec<MatchRecord> = self
            .stored_matches()
            .into_iter()
            .filter(|record| &record.company_id == id)
            .collect();
        records.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        Ok(records)
    }
}

pub(super) struct UnavailableStore;

impl CompanyRepository for UnavailableStore {
    fn insert_company(&self, _company: CompanyProfile) -> Result<CompanyProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_company(&self, _id: &CompanyId) -> Result<Option<CompanyProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl GrantRepository for UnavailableStore {
    fn active_grants(&self) -> Result<Vec<Grant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_grant(&self, _id: &GrantId) -> Result<Option<Grant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl MatchRepository for UnavailableStore {
    fn insert_matches(&self, _records: Vec<MatchRecord>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn matches_for_company(&self, _id: &CompanyId) -> Result<Vec<MatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
