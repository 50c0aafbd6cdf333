//! Broker commission routes: payout lifecycle and reporting.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use corretaje_db::{
    entities::sea_orm_active_enums::CommissionStatus, repositories::CommissionError,
    BrokerCommissionRepository,
};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the broker commissions router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/broker-commissions", get(list_commissions))
        .route("/broker-commissions/stats", get(payout_stats))
        .route("/broker-commissions/{id}/pay", post(mark_paid))
        .route("/broker-commissions/{id}/cancel", post(cancel))
        .route("/brokers/{id}/commissions", get(list_by_broker))
        .route("/operations/{id}/commissions", get(list_by_operation))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<CommissionStatus>,
}

#[derive(Debug, Deserialize)]
struct PayRequest {
    payment_method: Option<String>,
    payment_date: NaiveDate,
}

fn map_commission_error(e: CommissionError) -> Response {
    match e {
        CommissionError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "commission_not_found",
            &format!("Broker commission {id} does not exist"),
        ),
        CommissionError::AlreadySettled(id) => error_response(
            StatusCode::CONFLICT,
            "commission_settled",
            &format!("Broker commission {id} is already paid or cancelled"),
        ),
        CommissionError::Database(e) => internal_error("Database error", &e),
    }
}

/// GET /broker-commissions?status= - List commissions, optionally by status.
async fn list_commissions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = BrokerCommissionRepository::new((*state.db).clone());
    let result = match query.status {
        Some(status) => repo.list_by_status(status).await,
        None => repo.list_by_status(CommissionStatus::Pending).await,
    };
    match result {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => internal_error("Failed to list broker commissions", &e),
    }
}

/// GET /brokers/{id}/commissions - Commissions owed to one broker.
async fn list_by_broker(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = BrokerCommissionRepository::new((*state.db).clone());
    match repo.list_by_broker(id).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => internal_error("Failed to list broker commissions", &e),
    }
}

/// GET /operations/{id}/commissions - Commission snapshot of an operation.
async fn list_by_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BrokerCommissionRepository::new((*state.db).clone());
    match repo.list_by_operation(id).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => internal_error("Failed to list operation commissions", &e),
    }
}

/// POST /broker-commissions/{id}/pay - Settle a pending commission.
async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayRequest>,
) -> impl IntoResponse {
    let repo = BrokerCommissionRepository::new((*state.db).clone());
    match repo
        .mark_paid(id, payload.payment_method, payload.payment_date)
        .await
    {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => map_commission_error(e),
    }
}

/// POST /broker-commissions/{id}/cancel - Cancel a pending commission.
async fn cancel(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = BrokerCommissionRepository::new((*state.db).clone());
    match repo.cancel(id).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => map_commission_error(e),
    }
}

/// GET /broker-commissions/stats - Per-broker payout totals.
async fn payout_stats(State(state): State<AppState>) -> impl IntoResponse {
    let repo = BrokerCommissionRepository::new((*state.db).clone());
    match repo.payout_stats().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => internal_error("Failed to compute payout stats", &e),
    }
}
