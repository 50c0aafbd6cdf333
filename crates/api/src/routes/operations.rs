//! Operation routes: capture, patch, recompute, and payment views.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use corretaje_db::{
    entities::sea_orm_active_enums::{CostBasis, SchemeType},
    repositories::operation::PaymentStatus,
    repositories::OperationError,
    CreateOperationInput, OperationRepository, UpdateOperationInput,
};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the operations router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/operations", get(list_operations))
        .route("/operations", post(create_operation))
        .route("/operations/unpaid", get(list_unpaid))
        .route("/operations/partially-paid", get(list_partially_paid))
        .route("/operations/fully-paid", get(list_fully_paid))
        .route("/operations/{id}", get(get_operation))
        .route("/operations/{id}", patch(update_operation))
        .route("/operations/{id}", delete(delete_operation))
        .route(
            "/operations/{id}/recalculate-balance",
            post(recalculate_balance),
        )
        .route(
            "/operations/{id}/recalculate-commissions",
            post(recalculate_commissions),
        )
        .route("/operations/{id}/payment-stats", get(payment_stats))
}

#[derive(Debug, Deserialize)]
struct CreateOperationRequest {
    client_id: Uuid,
    company_id: Uuid,
    scheme_type: SchemeType,
    scheme_percent: Decimal,
    #[serde(default)]
    cost_basis: Option<CostBasis>,
    broker1_id: Option<Uuid>,
    broker1_percent: Option<Decimal>,
    broker2_id: Option<Uuid>,
    broker2_percent: Option<Decimal>,
    broker3_id: Option<Uuid>,
    broker3_percent: Option<Decimal>,
    deposit: Option<Decimal>,
    subtotal: Option<Decimal>,
    vat: Option<Decimal>,
    total: Option<Decimal>,
    operation_date: NaiveDate,
    invoice_folio: Option<String>,
    reference: Option<String>,
    receipt_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UpdateOperationRequest {
    client_id: Option<Uuid>,
    company_id: Option<Uuid>,
    scheme_type: Option<SchemeType>,
    scheme_percent: Option<Decimal>,
    cost_basis: Option<CostBasis>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker1_percent: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker2_percent: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker3_percent: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    deposit: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    subtotal: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    vat: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    total: Option<Option<Decimal>>,
    operation_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    invoice_folio: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    reference: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    receipt_url: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct RecalculateRequest {
    /// Version the client last read; guards against concurrent edits.
    version: i64,
}

fn map_operation_error(e: OperationError) -> Response {
    match e {
        OperationError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "operation_not_found",
            &format!("Operation {id} does not exist"),
        ),
        OperationError::VersionConflict { .. } => error_response(
            StatusCode::CONFLICT,
            "version_conflict",
            "The operation was modified concurrently; re-read and retry",
        ),
        OperationError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /operations - Capture an operation.
async fn create_operation(
    State(state): State<AppState>,
    Json(payload): Json<CreateOperationRequest>,
) -> impl IntoResponse {
    let repo = OperationRepository::new((*state.db).clone());

    let input = CreateOperationInput {
        client_id: payload.client_id,
        company_id: payload.company_id,
        scheme_type: payload.scheme_type,
        scheme_percent: payload.scheme_percent,
        cost_basis: payload.cost_basis.unwrap_or(CostBasis::Subtotal),
        broker1_id: payload.broker1_id,
        broker1_percent: payload.broker1_percent,
        broker2_id: payload.broker2_id,
        broker2_percent: payload.broker2_percent,
        broker3_id: payload.broker3_id,
        broker3_percent: payload.broker3_percent,
        deposit: payload.deposit,
        subtotal: payload.subtotal,
        vat: payload.vat,
        total: payload.total,
        operation_date: payload.operation_date,
        invoice_folio: payload.invoice_folio,
        reference: payload.reference,
        receipt_url: payload.receipt_url,
    };

    match repo.create_operation(input).await {
        Ok(op) => (StatusCode::CREATED, Json(op)).into_response(),
        Err(e) => map_operation_error(e),
    }
}

/// GET /operations - List operations.
async fn list_operations(State(state): State<AppState>) -> impl IntoResponse {
    let repo = OperationRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(ops) => (StatusCode::OK, Json(ops)).into_response(),
        Err(e) => internal_error("Failed to list operations", &e),
    }
}

/// GET /operations/{id} - Fetch one operation.
async fn get_operation(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = OperationRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(op)) => (StatusCode::OK, Json(op)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "operation_not_found",
            &format!("Operation {id} does not exist"),
        ),
        Err(e) => internal_error("Failed to fetch operation", &e),
    }
}

/// PATCH /operations/{id} - Patch an operation; derived fields follow.
async fn update_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOperationRequest>,
) -> impl IntoResponse {
    let repo = OperationRepository::new((*state.db).clone());

    let input = UpdateOperationInput {
        client_id: payload.client_id,
        company_id: payload.company_id,
        scheme_type: payload.scheme_type,
        scheme_percent: payload.scheme_percent,
        cost_basis: payload.cost_basis,
        broker1_percent: payload.broker1_percent,
        broker2_percent: payload.broker2_percent,
        broker3_percent: payload.broker3_percent,
        deposit: payload.deposit,
        subtotal: payload.subtotal,
        vat: payload.vat,
        total: payload.total,
        operation_date: payload.operation_date,
        invoice_folio: payload.invoice_folio,
        reference: payload.reference,
        receipt_url: payload.receipt_url,
    };

    match repo.update_operation(id, input).await {
        Ok(op) => (StatusCode::OK, Json(op)).into_response(),
        Err(e) => map_operation_error(e),
    }
}

/// DELETE /operations/{id} - Delete an operation and its children.
async fn delete_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OperationRepository::new((*state.db).clone());
    match repo.delete_operation(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_operation_error(e),
    }
}

/// POST /operations/{id}/recalculate-balance - Recompute the persisted balance.
async fn recalculate_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecalculateRequest>,
) -> impl IntoResponse {
    let repo = OperationRepository::new((*state.db).clone());
    match repo.recalculate_balance(id, payload.version).await {
        Ok(op) => (StatusCode::OK, Json(op)).into_response(),
        Err(e) => map_operation_error(e),
    }
}

/// POST /operations/{id}/recalculate-commissions - Recompute the cascade.
async fn recalculate_commissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecalculateRequest>,
) -> impl IntoResponse {
    let repo = OperationRepository::new((*state.db).clone());
    match repo.recalculate_commissions(id, payload.version).await {
        Ok(op) => (StatusCode::OK, Json(op)).into_response(),
        Err(e) => map_operation_error(e),
    }
}

/// GET /operations/{id}/payment-stats - Applied vs outstanding amounts.
async fn payment_stats(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = OperationRepository::new((*state.db).clone());
    match repo.payment_stats(id).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({
                "total": stats.total,
                "applied": stats.applied,
                "outstanding": stats.outstanding,
                "status": payment_status_str(stats.status),
            })),
        )
            .into_response(),
        Err(e) => map_operation_error(e),
    }
}

/// GET /operations/unpaid - Operations with nothing applied.
async fn list_unpaid(State(state): State<AppState>) -> impl IntoResponse {
    list_by_status(state, PaymentStatus::Unpaid).await
}

/// GET /operations/partially-paid - Operations partially covered.
async fn list_partially_paid(State(state): State<AppState>) -> impl IntoResponse {
    list_by_status(state, PaymentStatus::Partial).await
}

/// GET /operations/fully-paid - Operations fully covered.
async fn list_fully_paid(State(state): State<AppState>) -> impl IntoResponse {
    list_by_status(state, PaymentStatus::Paid).await
}

async fn list_by_status(state: AppState, status: PaymentStatus) -> Response {
    let repo = OperationRepository::new((*state.db).clone());
    match repo.list_by_payment_status(status).await {
        Ok(ops) => (StatusCode::OK, Json(ops)).into_response(),
        Err(e) => internal_error("Failed to list operations by payment status", &e),
    }
}

const fn payment_status_str(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Unpaid => "unpaid",
        PaymentStatus::Partial => "partial",
        PaymentStatus::Paid => "paid",
    }
}
