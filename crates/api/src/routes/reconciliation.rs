//! Reconciliation routes: link invoices to the movements that settle them.

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

use corretaje_db::{repositories::ReconciliationError, ReconciliationRepository};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the reconciliation router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reconciliation", post(assign))
        .route("/reconciliation/{id}", delete(unassign))
        .route("/invoices/{id}/links", get(list_by_invoice))
        .route("/bank-movements/{id}/links", get(list_by_movement))
}

#[derive(Debug, Deserialize)]
struct AssignRequest {
    invoice_id: Uuid,
    bank_movement_id: Uuid,
    amount_assigned: Decimal,
}

fn map_reconciliation_error(e: ReconciliationError) -> Response {
    match e {
        ReconciliationError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "link_not_found",
            &format!("Invoice-movement link {id} does not exist"),
        ),
        ReconciliationError::InvoiceNotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "invoice_not_found",
            &format!("Invoice {id} does not exist"),
        ),
        ReconciliationError::MovementNotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "movement_not_found",
            &format!("Bank movement {id} does not exist"),
        ),
        ReconciliationError::AlreadyLinked {
            invoice_id,
            bank_movement_id,
        } => error_response(
            StatusCode::CONFLICT,
            "already_linked",
            &format!("Invoice {invoice_id} is already linked to movement {bank_movement_id}"),
        ),
        ReconciliationError::NonPositiveAmount => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "non_positive_amount",
            "Assigned amount must be positive",
        ),
        ReconciliationError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /reconciliation - Assign part of a movement to an invoice.
async fn assign(
    State(state): State<AppState>,
    Json(payload): Json<AssignRequest>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());
    match repo
        .assign(
            payload.invoice_id,
            payload.bank_movement_id,
            payload.amount_assigned,
        )
        .await
    {
        Ok(link) => (StatusCode::CREATED, Json(link)).into_response(),
        Err(e) => map_reconciliation_error(e),
    }
}

/// DELETE /reconciliation/{id} - Remove a link.
async fn unassign(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());
    match repo.unassign(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_reconciliation_error(e),
    }
}

/// GET /invoices/{id}/links - Movements linked to an invoice.
async fn list_by_invoice(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());
    match repo.list_by_invoice(id).await {
        Ok(links) => (StatusCode::OK, Json(links)).into_response(),
        Err(e) => internal_error("Failed to list invoice links", &e),
    }
}

/// GET /bank-movements/{id}/links - Invoices linked to a movement.
async fn list_by_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());
    match repo.list_by_movement(id).await {
        Ok(links) => (StatusCode::OK, Json(links)).into_response(),
        Err(e) => internal_error("Failed to list movement links", &e),
    }
}
