//! Bank account routes, including the derived balance view.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use corretaje_db::{repositories::BankError, BankRepository, CreateBankInput, UpdateBankInput};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the banks router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/banks", get(list_banks))
        .route("/banks", post(create_bank))
        .route("/banks/{id}", get(get_bank))
        .route("/banks/{id}", patch(update_bank))
        .route("/banks/{id}", delete(delete_bank))
        .route("/banks/{id}/balance", get(current_balance))
}

#[derive(Debug, Deserialize)]
struct CreateBankRequest {
    bank_name: String,
    account_number: String,
    clabe: Option<String>,
    #[serde(default)]
    initial_balance: Decimal,
    company_id: Uuid,
}

#[derive(Debug, Deserialize, Default)]
struct UpdateBankRequest {
    bank_name: Option<String>,
    account_number: Option<String>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    clabe: Option<Option<String>>,
    initial_balance: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    company_id: Option<Uuid>,
}

fn map_bank_error(e: BankError) -> Response {
    match e {
        BankError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "bank_not_found",
            &format!("Bank account {id} does not exist"),
        ),
        BankError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /banks - Register a bank account.
async fn create_bank(
    State(state): State<AppState>,
    Json(payload): Json<CreateBankRequest>,
) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    let input = CreateBankInput {
        bank_name: payload.bank_name,
        account_number: payload.account_number,
        clabe: payload.clabe,
        initial_balance: payload.initial_balance,
        company_id: payload.company_id,
    };
    match repo.create_bank(input).await {
        Ok(bank) => (StatusCode::CREATED, Json(bank)).into_response(),
        Err(e) => internal_error("Failed to create bank account", &e),
    }
}

/// GET /banks?company_id= - List accounts, optionally for one company.
async fn list_banks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    match repo.list(query.company_id).await {
        Ok(banks) => (StatusCode::OK, Json(banks)).into_response(),
        Err(e) => internal_error("Failed to list bank accounts", &e),
    }
}

/// GET /banks/{id} - Fetch one account.
async fn get_bank(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(bank)) => (StatusCode::OK, Json(bank)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "bank_not_found",
            &format!("Bank account {id} does not exist"),
        ),
        Err(e) => internal_error("Failed to fetch bank account", &e),
    }
}

/// PATCH /banks/{id} - Update an account.
async fn update_bank(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBankRequest>,
) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    let input = UpdateBankInput {
        bank_name: payload.bank_name,
        account_number: payload.account_number,
        clabe: payload.clabe,
        initial_balance: payload.initial_balance,
    };
    match repo.update_bank(id, input).await {
        Ok(bank) => (StatusCode::OK, Json(bank)).into_response(),
        Err(e) => map_bank_error(e),
    }
}

/// DELETE /banks/{id} - Remove an account.
async fn delete_bank(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    match repo.delete_bank(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_bank_error(e),
    }
}

/// GET /banks/{id}/balance - Initial balance plus net recorded movements.
async fn current_balance(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = BankRepository::new((*state.db).clone());
    match repo.current_balance(id).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({ "bank_id": id, "balance": balance })),
        )
            .into_response(),
        Err(e) => map_bank_error(e),
    }
}
