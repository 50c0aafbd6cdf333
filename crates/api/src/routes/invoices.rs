//! Invoice routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use corretaje_db::{
    entities::sea_orm_active_enums::InvoiceStatus, repositories::InvoiceError, ConceptInput,
    CreateInvoiceInput, InvoiceRepository,
};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the invoices router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}", delete(delete_invoice))
        .route("/invoices/{id}/status", put(set_status))
}

#[derive(Debug, Deserialize)]
struct ConceptRequest {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
struct CreateInvoiceRequest {
    company_id: Uuid,
    receiver: String,
    rfc: Option<String>,
    folio: String,
    cfdi_uuid: Option<String>,
    voucher_type: Option<String>,
    issue_date: NaiveDate,
    payment_method: Option<String>,
    payment_form: Option<String>,
    concepts: Vec<ConceptRequest>,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: InvoiceStatus,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    company_id: Option<Uuid>,
}

fn map_invoice_error(e: InvoiceError) -> Response {
    match e {
        InvoiceError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "invoice_not_found",
            &format!("Invoice {id} does not exist"),
        ),
        InvoiceError::DuplicateFolio(folio) => error_response(
            StatusCode::CONFLICT,
            "duplicate_folio",
            &format!("Invoice folio '{folio}' already exists"),
        ),
        InvoiceError::NoConcepts => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "no_concepts",
            "Invoice must have at least one concept",
        ),
        InvoiceError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /invoices - Create an invoice with its concept lines.
async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    let input = CreateInvoiceInput {
        company_id: payload.company_id,
        receiver: payload.receiver,
        rfc: payload.rfc,
        folio: payload.folio,
        cfdi_uuid: payload.cfdi_uuid,
        voucher_type: payload.voucher_type,
        issue_date: payload.issue_date,
        payment_method: payload.payment_method,
        payment_form: payload.payment_form,
        concepts: payload
            .concepts
            .into_iter()
            .map(|c| ConceptInput {
                description: c.description,
                quantity: c.quantity,
                unit_price: c.unit_price,
            })
            .collect(),
    };
    match repo.create_invoice(input).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({
                "invoice": created.invoice,
                "concepts": created.concepts,
            })),
        )
            .into_response(),
        Err(e) => map_invoice_error(e),
    }
}

/// GET /invoices?company_id= - List invoices, optionally per company.
async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.list(query.company_id).await {
        Ok(invoices) => (StatusCode::OK, Json(invoices)).into_response(),
        Err(e) => internal_error("Failed to list invoices", &e),
    }
}

/// GET /invoices/{id} - Fetch an invoice and its concepts.
async fn get_invoice(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.find_with_concepts(id).await {
        Ok(found) => (
            StatusCode::OK,
            Json(json!({
                "invoice": found.invoice,
                "concepts": found.concepts,
            })),
        )
            .into_response(),
        Err(e) => map_invoice_error(e),
    }
}

/// PUT /invoices/{id}/status - Set the invoice status.
async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.set_status(id, payload.status).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => map_invoice_error(e),
    }
}

/// DELETE /invoices/{id} - Remove an invoice and its concepts.
async fn delete_invoice(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.delete_invoice(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_invoice_error(e),
    }
}
