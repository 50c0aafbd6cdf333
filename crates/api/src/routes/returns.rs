//! Return routes: repayments recorded against operations.

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
use uuid::Uuid;

use corretaje_db::{
    repositories::ReturnError, CreateReturnInput, ReturnRepository, UpdateReturnInput,
};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the returns router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/operations/{id}/returns", get(list_returns))
        .route("/operations/{id}/returns", post(create_return))
        .route("/returns/{id}", patch(update_return))
        .route("/returns/{id}", delete(delete_return))
}

#[derive(Debug, Deserialize)]
struct CreateReturnRequest {
    payment_date: NaiveDate,
    amount_paid: Decimal,
    payment_method: Option<String>,
    reference: Option<String>,
    receipt_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UpdateReturnRequest {
    payment_date: Option<NaiveDate>,
    amount_paid: Option<Decimal>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    payment_method: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    reference: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    receipt_url: Option<Option<String>>,
}

fn map_return_error(e: ReturnError) -> Response {
    match e {
        ReturnError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "return_not_found",
            &format!("Return {id} does not exist"),
        ),
        ReturnError::OperationNotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "operation_not_found",
            &format!("Operation {id} does not exist"),
        ),
        ReturnError::Database(e) => internal_error("Database error", &e),
    }
}

/// GET /operations/{id}/returns - Returns for an operation.
async fn list_returns(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ReturnRepository::new((*state.db).clone());
    match repo.list_by_operation(id).await {
        Ok(returns) => (StatusCode::OK, Json(returns)).into_response(),
        Err(e) => internal_error("Failed to list returns", &e),
    }
}

/// POST /operations/{id}/returns - Record a repayment.
async fn create_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateReturnRequest>,
) -> impl IntoResponse {
    let repo = ReturnRepository::new((*state.db).clone());
    let input = CreateReturnInput {
        operation_id: id,
        payment_date: payload.payment_date,
        amount_paid: payload.amount_paid,
        payment_method: payload.payment_method,
        reference: payload.reference,
        receipt_url: payload.receipt_url,
    };

    match repo.create_return(input).await {
        Ok(ret) => (StatusCode::CREATED, Json(ret)).into_response(),
        Err(e) => map_return_error(e),
    }
}

/// PATCH /returns/{id} - Patch a repayment.
async fn update_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReturnRequest>,
) -> impl IntoResponse {
    let repo = ReturnRepository::new((*state.db).clone());
    let input = UpdateReturnInput {
        payment_date: payload.payment_date,
        amount_paid: payload.amount_paid,
        payment_method: payload.payment_method,
        reference: payload.reference,
        receipt_url: payload.receipt_url,
    };

    match repo.update_return(id, input).await {
        Ok(ret) => (StatusCode::OK, Json(ret)).into_response(),
        Err(e) => map_return_error(e),
    }
}

/// DELETE /returns/{id} - Remove a repayment.
async fn delete_return(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ReturnRepository::new((*state.db).clone());
    match repo.delete_return(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_return_error(e),
    }
}
