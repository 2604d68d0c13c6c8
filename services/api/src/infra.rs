use agevo_match::matching::{
    CatalogImportError, CompanyId, CompanyProfile, CompanyRepository, Grant, GrantCatalog,
    GrantId, GrantRepository, MatchRecord, MatchRepository, RepositoryError,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store seeded from a grant catalog. Contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStore {
    companies: Arc<Mutex<HashMap<CompanyId, CompanyProfile>>>,
    grants: Arc<Vec<Grant>>,
    matches: Arc<Mutex<Vec<MatchRecord>>>,
}

impl InMemoryStore {
    pub(crate) fn from_catalog(catalog: GrantCatalog) -> Self {
        Self {
            grants: Arc::new(catalog.into_grants()),
            ..Self::default()
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
}

impl CompanyRepository for InMemoryStore {
    fn insert_company(&self, company: CompanyProfile) -> Result<CompanyProfile, RepositoryError> {
        let mut guard = lock(&self.companies)?;
        if guard.contains_key(&company.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn fetch_company(&self, id: &CompanyId) -> Result<Option<CompanyProfile>, RepositoryError> {
        let guard = lock(&self.companies)?;
        Ok(guard.get(id).cloned())
    }
}

impl GrantRepository for InMemoryStore {
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

impl MatchRepository for InMemoryStore {
    fn insert_matches(&self, records: Vec<MatchRecord>) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.matches)?;
        if records
            .iter()
            .any(|record| guard.iter().any(|stored| stored.id == record.id))
        {
            return Err(RepositoryError::Conflict);
        }
        guard.extend(records);
        Ok(())
    }

    fn matches_for_company(&self, id: &CompanyId) -> Result<Vec<MatchRecord>, RepositoryError> {
        let guard = lock(&self.matches)?;
        let mut records: Vec<MatchRecord> = guard
            .iter()
            .filter(|record| &record.company_id == id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        Ok(records)
    }
}

/// The catalog at `path`, or the bundled sample when no path is configured.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<GrantCatalog, CatalogImportError> {
    match path {
        Some(path) => GrantCatalog::from_path(path),
        None => GrantCatalog::sample(),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Scoring instant for an optional `--today` override: midnight UTC of that day.
pub(crate) fn scoring_instant(today: Option<NaiveDate>) -> DateTime<Utc> {
    today
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or_else(Utc::now)
}
