//! Payment application routes: tie bank deposits to operations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use corretaje_db::{repositories::PaymentError, ApplyPaymentInput, PaymentRepository};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the payments router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(apply_payment))
        .route("/payments/{id}", delete(remove_application))
        .route("/operations/{id}/payments", get(list_by_operation))
        .route("/bank-movements/{id}/payments", get(list_by_movement))
}

#[derive(Debug, Deserialize)]
struct ApplyPaymentRequest {
    operation_id: Uuid,
    bank_movement_id: Uuid,
    amount_applied: Decimal,
}

fn map_payment_error(e: PaymentError) -> Response {
    match e {
        PaymentError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "payment_not_found",
            &format!("Payment application {id} does not exist"),
        ),
        PaymentError::OperationNotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "operation_not_found",
            &format!("Operation {id} does not exist"),
        ),
        PaymentError::MovementNotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "movement_not_found",
            &format!("Bank movement {id} does not exist"),
        ),
        PaymentError::NonPositiveAmount => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "non_positive_amount",
            "Applied amount must be positive",
        ),
        PaymentError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /payments - Apply (part of) a deposit to an operation.
async fn apply_payment(
    State(state): State<AppState>,
    Json(payload): Json<ApplyPaymentRequest>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());
    let input = ApplyPaymentInput {
        operation_id: payload.operation_id,
        bank_movement_id: payload.bank_movement_id,
        amount_applied: payload.amount_applied,
    };
    match repo.apply_payment(input).await {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(e) => map_payment_error(e),
    }
}

/// GET /operations/{id}/payments - Applications against an operation.
async fn list_by_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list_by_operation(id).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => internal_error("Failed to list payment applications", &e),
    }
}

/// GET /bank-movements/{id}/payments - Applications drawing on a movement.
async fn list_by_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list_by_movement(id).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => internal_error("Failed to list payment applications", &e),
    }
}

/// DELETE /payments/{id} - Undo an application.
async fn remove_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());
    match repo.remove_application(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_payment_error(e),
    }
}
