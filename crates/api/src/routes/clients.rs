//! Client routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use corretaje_db::{
    repositories::ClientError, ClientRepository, CreateClientInput, UpdateClientInput,
};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the clients router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/clients", post(create_client))
        .route("/clients/{id}", get(get_client))
        .route("/clients/{id}", patch(update_client))
        .route("/clients/{id}", delete(delete_client))
}

#[derive(Debug, Deserialize)]
struct CreateClientRequest {
    name: String,
    site: String,
    origin: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UpdateClientRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    origin: Option<Option<String>>,
}

fn map_client_error(e: ClientError) -> Response {
    match e {
        ClientError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "client_not_found",
            &format!("Client {id} does not exist"),
        ),
        ClientError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /clients - Register a client; the code is generated per site.
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    let input = CreateClientInput {
        name: payload.name,
        site: payload.site,
        origin: payload.origin,
    };
    match repo.create_client(input).await {
        Ok(client) => (StatusCode::CREATED, Json(client)).into_response(),
        Err(e) => map_client_error(e),
    }
}

/// GET /clients - List clients.
async fn list_clients(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(e) => internal_error("Failed to list clients", &e),
    }
}

/// GET /clients/{id} - Fetch one client.
async fn get_client(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(client)) => (StatusCode::OK, Json(client)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "client_not_found",
            &format!("Client {id} does not exist"),
        ),
        Err(e) => internal_error("Failed to fetch client", &e),
    }
}

/// PATCH /clients/{id} - Update name or origin; code and site are immutable.
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    let input = UpdateClientInput {
        name: payload.name,
        origin: payload.origin,
    };
    match repo.update_client(id, input).await {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => map_client_error(e),
    }
}

/// DELETE /clients/{id} - Remove a client.
async fn delete_client(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    match repo.delete_client(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_client_error(e),
    }
}
