//! Scheme routes.
//!
//! Schemes are templates; editing one affects future operations only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use corretaje_db::{
    entities::sea_orm_active_enums::{CostBasis, SchemeType},
    repositories::SchemeError,
    CreateSchemeInput, SchemeRepository, UpdateSchemeInput,
};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the schemes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schemes", get(list_schemes))
        .route("/schemes", post(create_scheme))
        .route("/schemes/{id}", get(get_scheme))
        .route("/schemes/{id}", patch(update_scheme))
        .route("/schemes/{id}", delete(delete_scheme))
}

#[derive(Debug, Deserialize)]
struct CreateSchemeRequest {
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
}

#[derive(Debug, Deserialize, Default)]
struct UpdateSchemeRequest {
    scheme_percent: Option<Decimal>,
    cost_basis: Option<CostBasis>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker1_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker1_percent: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker2_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker2_percent: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker3_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    broker3_percent: Option<Option<Decimal>>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    scheme_type: Option<SchemeType>,
}

fn map_scheme_error(e: SchemeError) -> Response {
    match e {
        SchemeError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "scheme_not_found",
            &format!("Scheme {id} does not exist"),
        ),
        SchemeError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /schemes - Create a scheme template.
async fn create_scheme(
    State(state): State<AppState>,
    Json(payload): Json<CreateSchemeRequest>,
) -> impl IntoResponse {
    let repo = SchemeRepository::new((*state.db).clone());
    let input = CreateSchemeInput {
        scheme_type: payload.scheme_type,
        scheme_percent: payload.scheme_percent,
        cost_basis: payload.cost_basis.unwrap_or(CostBasis::Subtotal),
        broker1_id: payload.broker1_id,
        broker1_percent: payload.broker1_percent,
        broker2_id: payload.broker2_id,
        broker2_percent: payload.broker2_percent,
        broker3_id: payload.broker3_id,
        broker3_percent: payload.broker3_percent,
    };
    match repo.create_scheme(input).await {
        Ok(scheme) => (StatusCode::CREATED, Json(scheme)).into_response(),
        Err(e) => internal_error("Failed to create scheme", &e),
    }
}

/// GET /schemes?scheme_type= - List schemes, optionally by type.
async fn list_schemes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = SchemeRepository::new((*state.db).clone());
    match repo.list(query.scheme_type).await {
        Ok(schemes) => (StatusCode::OK, Json(schemes)).into_response(),
        Err(e) => internal_error("Failed to list schemes", &e),
    }
}

/// GET /schemes/{id} - Fetch one scheme.
async fn get_scheme(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = SchemeRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(scheme)) => (StatusCode::OK, Json(scheme)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "scheme_not_found",
            &format!("Scheme {id} does not exist"),
        ),
        Err(e) => internal_error("Failed to fetch scheme", &e),
    }
}

/// PATCH /schemes/{id} - Update a scheme template.
async fn update_scheme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSchemeRequest>,
) -> impl IntoResponse {
    let repo = SchemeRepository::new((*state.db).clone());
    let input = UpdateSchemeInput {
        scheme_percent: payload.scheme_percent,
        cost_basis: payload.cost_basis,
        broker1_id: payload.broker1_id,
        broker1_percent: payload.broker1_percent,
        broker2_id: payload.broker2_id,
        broker2_percent: payload.broker2_percent,
        broker3_id: payload.broker3_id,
        broker3_percent: payload.broker3_percent,
    };
    match repo.update_scheme(id, input).await {
        Ok(scheme) => (StatusCode::OK, Json(scheme)).into_response(),
        Err(e) => map_scheme_error(e),
    }
}

/// DELETE /schemes/{id} - Remove a scheme template.
async fn delete_scheme(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = SchemeRepository::new((*state.db).clone());
    match repo.delete_scheme(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_scheme_error(e),
    }
}
