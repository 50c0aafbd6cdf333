//! Reporting routes: date-ranged aggregates over operations and invoices.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use corretaje_db::{repositories::ReportError, ReportRepository};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the reports router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/commission-summary", get(commission_summary))
        .route("/reports/balance-summary", get(balance_summary))
        .route("/reports/billing-by-company", get(billing_by_company))
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    start: NaiveDate,
    end: NaiveDate,
}

fn map_report_error(e: ReportError) -> Response {
    match e {
        ReportError::InvalidDateRange { start, end } => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_date_range",
            &format!("Start date {start} is after end date {end}"),
        ),
        ReportError::Database(e) => internal_error("Database error", &e),
    }
}

/// GET /reports/commission-summary?start=&end= - Cascade totals in range.
async fn commission_summary(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new((*state.db).clone());
    match repo.commission_summary(range.start, range.end).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => map_report_error(e),
    }
}

/// GET /reports/balance-summary?start=&end= - Deposit and balance totals.
async fn balance_summary(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new((*state.db).clone());
    match repo.balance_summary(range.start, range.end).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => map_report_error(e),
    }
}

/// GET /reports/billing-by-company?start=&end= - Invoice totals per company.
async fn billing_by_company(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new((*state.db).clone());
    match repo.billing_by_company(range.start, range.end).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => map_report_error(e),
    }
}
