//! Bank movement routes.

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
    repositories::MovementError, CreateMovementInput, MovementRepository, UpdateMovementInput,
};

use crate::middleware::auth::AuthUser;
use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the bank movements router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/banks/{id}/movements", get(list_movements))
        .route("/banks/{id}/movements", post(create_movement))
        .route("/bank-movements/{id}", get(get_movement))
        .route("/bank-movements/{id}", patch(update_movement))
        .route("/bank-movements/{id}", delete(delete_movement))
}

#[derive(Debug, Deserialize)]
struct CreateMovementRequest {
    #[serde(default)]
    inflow: Decimal,
    #[serde(default)]
    outflow: Decimal,
    movement_date: NaiveDate,
    description: Option<String>,
    reference: Option<String>,
    comments: Option<String>,
    invoice_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Default)]
struct UpdateMovementRequest {
    inflow: Option<Decimal>,
    outflow: Option<Decimal>,
    movement_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    reference: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    comments: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    invoice_id: Option<Option<Uuid>>,
}

fn map_movement_error(e: MovementError) -> Response {
    match e {
        MovementError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "movement_not_found",
            &format!("Bank movement {id} does not exist"),
        ),
        MovementError::InvalidFlow => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_flow",
            "A movement must have a positive inflow or outflow, not both",
        ),
        MovementError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /banks/{id}/movements - Record a statement movement.
async fn create_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    let input = CreateMovementInput {
        bank_id: id,
        inflow: payload.inflow,
        outflow: payload.outflow,
        movement_date: payload.movement_date,
        description: payload.description,
        reference: payload.reference,
        comments: payload.comments,
        invoice_id: payload.invoice_id,
        user_id: Some(auth.user_id()),
    };
    match repo.create_movement(input).await {
        Ok(movement) => (StatusCode::CREATED, Json(movement)).into_response(),
        Err(e) => map_movement_error(e),
    }
}

/// GET /banks/{id}/movements - Movements for one account.
async fn list_movements(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    match repo.list_by_bank(id).await {
        Ok(movements) => (StatusCode::OK, Json(movements)).into_response(),
        Err(e) => internal_error("Failed to list bank movements", &e),
    }
}

/// GET /bank-movements/{id} - Fetch one movement.
async fn get_movement(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(movement)) => (StatusCode::OK, Json(movement)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "movement_not_found",
            &format!("Bank movement {id} does not exist"),
        ),
        Err(e) => internal_error("Failed to fetch bank movement", &e),
    }
}

/// PATCH /bank-movements/{id} - Update a movement.
async fn update_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovementRequest>,
) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    let input = UpdateMovementInput {
        inflow: payload.inflow,
        outflow: payload.outflow,
        movement_date: payload.movement_date,
        description: payload.description,
        reference: payload.reference,
        comments: payload.comments,
        invoice_id: payload.invoice_id,
    };
    match repo.update_movement(id, input).await {
        Ok(movement) => (StatusCode::OK, Json(movement)).into_response(),
        Err(e) => map_movement_error(e),
    }
}

/// DELETE /bank-movements/{id} - Remove a movement.
async fn delete_movement(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    match repo.delete_movement(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_movement_error(e),
    }
}
