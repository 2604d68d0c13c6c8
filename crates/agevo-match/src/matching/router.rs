use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{CompanyId, CompanySubmission, GrantId};
use super::engine::Priority;
use super::repository::{MatchStore, RepositoryError};
use super::service::{MatchingService, MatchingServiceError};

/// Router builder exposing intake, match listing, reports, and the active catalog.
pub fn matching_router<S>(service: Arc<MatchingService<S>>) -> Router
where
    S: MatchStore + 'static,
{
    Router::new()
        .route("/api/v1/companies", post(submit_handler::<S>))
        .route(
            "/api/v1/companies/:company_id/matches",
            get(matches_handler::<S>),
        )
        .route(
            "/api/v1/companies/:company_id/matches/:grant_id/report",
            get(report_handler::<S>),
        )
        .route("/api/v1/grants", get(grants_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MatchQuery {
    priority: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}

fn service_error_response(error: MatchingServiceError) -> Response {
    match error {
        MatchingServiceError::Profile(violation) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, violation.to_string())
        }
        MatchingServiceError::Repository(RepositoryError::Conflict) => {
            error_response(StatusCode::CONFLICT, "company already exists")
        }
        MatchingServiceError::UnknownCompany(_) | MatchingServiceError::UnknownGrant(_) => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    axum::Json(submission): axum::Json<CompanySubmission>,
) -> Response
where
    S: MatchStore + 'static,
{
    match service.submit(submission, Utc::now()) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn matches_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(company_id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> Response
where
    S: MatchStore + 'static,
{
    let priority = match query.priority.as_deref().map(str::parse::<Priority>) {
        Some(Ok(priority)) => Some(priority),
        Some(Err(error)) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
        None => None,
    };

    match service.matches_for(&CompanyId(company_id), priority) {
        Ok(board) => (StatusCode::OK, axum::Json(board)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn report_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path((company_id, grant_id)): Path<(String, String)>,
) -> Response
where
    S: MatchStore + 'static,
{
    match service.report(&CompanyId(company_id), &GrantId(grant_id), Utc::now()) {
        Ok(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report,
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn grants_handler<S>(State(service): State<Arc<MatchingService<S>>>) -> Response
where
    S: MatchStore + 'static,
{
    match service.active_grants() {
        Ok(grants) => (StatusCode::OK, axum::Json(grants)).into_response(),
        Err(error) => service_error_response(error),
    }
}
