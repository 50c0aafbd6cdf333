//! Broker routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use corretaje_db::{repositories::BrokerError, BrokerRepository};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the brokers router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/brokers", get(list_brokers))
        .route("/brokers", post(create_broker))
        .route("/brokers/{id}", get(get_broker))
        .route("/brokers/{id}", patch(rename_broker))
        .route("/brokers/{id}", delete(delete_broker))
}

#[derive(Debug, Deserialize)]
struct BrokerRequest {
    name: String,
}

fn map_broker_error(e: BrokerError) -> Response {
    match e {
        BrokerError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "broker_not_found",
            &format!("Broker {id} does not exist"),
        ),
        BrokerError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /brokers - Register a broker.
async fn create_broker(
    State(state): State<AppState>,
    Json(payload): Json<BrokerRequest>,
) -> impl IntoResponse {
    let repo = BrokerRepository::new((*state.db).clone());
    match repo.create_broker(payload.name).await {
        Ok(broker) => (StatusCode::CREATED, Json(broker)).into_response(),
        Err(e) => internal_error("Failed to create broker", &e),
    }
}

/// GET /brokers - List brokers.
async fn list_brokers(State(state): State<AppState>) -> impl IntoResponse {
    let repo = BrokerRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(brokers) => (StatusCode::OK, Json(brokers)).into_response(),
        Err(e) => internal_error("Failed to list brokers", &e),
    }
}

/// GET /brokers/{id} - Fetch one broker.
async fn get_broker(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = BrokerRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(broker)) => (StatusCode::OK, Json(broker)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "broker_not_found",
            &format!("Broker {id} does not exist"),
        ),
        Err(e) => internal_error("Failed to fetch broker", &e),
    }
}

/// PATCH /brokers/{id} - Rename a broker.
async fn rename_broker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BrokerRequest>,
) -> impl IntoResponse {
    let repo = BrokerRepository::new((*state.db).clone());
    match repo.rename_broker(id, payload.name).await {
        Ok(broker) => (StatusCode::OK, Json(broker)).into_response(),
        Err(e) => map_broker_error(e),
    }
}

/// DELETE /brokers/{id} - Remove a broker.
async fn delete_broker(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = BrokerRepository::new((*state.db).clone());
    match repo.delete_broker(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_broker_error(e),
    }
}
