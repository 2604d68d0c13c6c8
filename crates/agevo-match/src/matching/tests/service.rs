use std::sync::Arc;

use super::common::*;

use crate::matching::domain::{
    CompanyId, CompanySize, Grant, GrantId, GrantStatus, InvestmentGoal,
};
use crate::matching::engine::{Priority, ScoreBand};
use crate::matching::repository::RepositoryError;
use crate::matching::{MatchingService, MatchingServiceError};

fn catalog() -> Vec<Grant> {
    vec![
        Grant {
            eligible_company_sizes: vec![CompanySize::Large],
            eligible_investment_goals: vec![InvestmentGoal::Other],
            ..grant("bando-partial")
        },
        grant("bando-full"),
        unrelated_grant("bando-poor"),
        Grant {
            status: GrantStatus::Closed,
            ..grant("bando-closed")
        },
    ]
}

#[test]
fn submit_stores_company_and_ranked_matches() {
    let (service, store) = build_service(catalog());

    let outcome = service
        .submit(submission(), now())
        .expect("submission succeeds");

    assert!(outcome.company.id.0.starts_with("cmp-"));
    assert_eq!(outcome.company.email, "giulia@officinerossi.it");

    let ids: Vec<&str> = outcome
        .matches
        .iter()
        .map(|result| result.grant_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["bando-full", "bando-partial"]);

    let stored = store.stored_matches();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|record| record.company_id == outcome.company.id));
    assert!(stored.iter().all(|record| !record.viewed && !record.saved));
    assert_eq!(stored[0].match_score, 100);
    assert_eq!(stored[0].match_reasons.priority, Priority::Urgent);
    assert!(stored[0].id.starts_with("match-"));
}

#[test]
fn submit_rejects_invalid_profiles_before_storing() {
    let (service, store) = build_service(catalog());
    let mut invalid = submission();
    invalid.email = "not-an-email".to_string();

    let error = service.submit(invalid, now()).expect_err("invalid email");

    assert!(matches!(error, MatchingServiceError::Profile(_)));
    assert!(store.companies.lock().expect("company mutex").is_empty());
    assert!(store.stored_matches().is_empty());
}

#[test]
fn matches_are_grouped_by_band_and_filterable() {
    let (service, _) = build_service(catalog());
    let outcome = service.submit(submission(), now()).expect("submission");

    let board = service
        .matches_for(&outcome.company.id, None)
        .expect("board");
    assert_eq!(board.total, 2);
    let bands: Vec<ScoreBand> = board.groups.iter().map(|group| group.band).collect();
    assert_eq!(bands, vec![ScoreBand::Excellent, ScoreBand::Good]);
    assert_eq!(board.groups[0].label, "Excellent match");
    assert_eq!(board.groups[0].matches[0].grant.id, GrantId("bando-full".to_string()));

    let urgent = service
        .matches_for(&outcome.company.id, Some(Priority::Urgent))
        .expect("urgent board");
    assert_eq!(urgent.total, 1);
    assert_eq!(urgent.matches().count(), 1);

    let low = service
        .matches_for(&outcome.company.id, Some(Priority::Low))
        .expect("low board");
    assert_eq!(low.total, 0);
    assert!(low.groups.is_empty());
}

#[test]
fn unknown_company_is_reported() {
    let (service, _) = build_service(catalog());

    let error = service
        .matches_for(&CompanyId("cmp-missing".to_string()), None)
        .expect_err("unknown company");

    assert!(matches!(error, MatchingServiceError::UnknownCompany(_)));
    assert_eq!(error.to_string(), "company 'cmp-missing' not found");
}

#[test]
fn report_rescores_any_known_grant() {
    let (service, _) = build_service(catalog());
    let outcome = service.submit(submission(), now()).expect("submission");

    let report = service
        .report(&outcome.company.id, &GrantId("bando-closed".to_string()), now())
        .expect("report renders");
    assert!(report.contains("TOTAL SCORE: 100%"));

    let error = service
        .report(&outcome.company.id, &GrantId("bando-missing".to_string()), now())
        .expect_err("unknown grant");
    assert!(matches!(error, MatchingServiceError::UnknownGrant(_)));
}

#[test]
fn active_grants_skip_closed_entries() {
    let (service, _) = build_service(catalog());

    let grants = service.active_grants().expect("grants");

    assert_eq!(grants.len(), 3);
    assert!(grants.iter().all(|grant| grant.is_active()));
}

#[test]
fn repository_failures_surface_as_service_errors() {
    let service = MatchingService::new(Arc::new(UnavailableStore));

    match service.submit(submission(), now()) {
        Err(MatchingServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline");
        }
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[test]
fn failed_match_write_leaves_the_company_stored() {
    let store = Arc::new(MemoryStore {
        reject_match_writes: true,
        ..MemoryStore::with_grants(catalog())
    });
    let service = MatchingService::new(store.clone());

    match service.submit(submission(), now()) {
        Err(MatchingServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "match table locked");
        }
        other => panic!("expected repository error, got {other:?}"),
    }

    let companies = store.companies.lock().expect("company mutex poisoned");
    assert_eq!(companies.len(), 1);
    let stored = companies.values().next().expect("one company");
    assert_eq!(stored.email, "giulia@officinerossi.it");
    drop(companies);

    assert!(store.stored_matches().is_empty());
}
