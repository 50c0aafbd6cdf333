//! Company routes.

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
    repositories::CompanyError, CompanyRepository, CreateCompanyInput, UpdateCompanyInput,
};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the companies router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies))
        .route("/companies", post(create_company))
        .route("/companies/{id}", get(get_company))
        .route("/companies/{id}", patch(update_company))
        .route("/companies/{id}", delete(delete_company))
}

#[derive(Debug, Deserialize)]
struct CreateCompanyRequest {
    name: String,
    rfc: Option<String>,
    line_of_business: Option<String>,
    destination: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UpdateCompanyRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    rfc: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    line_of_business: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    destination: Option<Option<String>>,
}

fn map_company_error(e: CompanyError) -> Response {
    match e {
        CompanyError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "company_not_found",
            &format!("Company {id} does not exist"),
        ),
        CompanyError::Database(e) => internal_error("Database error", &e),
    }
}

/// POST /companies - Register a company.
async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> impl IntoResponse {
    let repo = CompanyRepository::new((*state.db).clone());
    let input = CreateCompanyInput {
        name: payload.name,
        rfc: payload.rfc,
        line_of_business: payload.line_of_business,
        destination: payload.destination,
    };
    match repo.create_company(input).await {
        Ok(company) => (StatusCode::CREATED, Json(company)).into_response(),
        Err(e) => internal_error("Failed to create company", &e),
    }
}

/// GET /companies - List companies.
async fn list_companies(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CompanyRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(companies) => (StatusCode::OK, Json(companies)).into_response(),
        Err(e) => internal_error("Failed to list companies", &e),
    }
}

/// GET /companies/{id} - Fetch one company.
async fn get_company(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CompanyRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(company)) => (StatusCode::OK, Json(company)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "company_not_found",
            &format!("Company {id} does not exist"),
        ),
        Err(e) => internal_error("Failed to fetch company", &e),
    }
}

/// PATCH /companies/{id} - Update a company.
async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> impl IntoResponse {
    let repo = CompanyRepository::new((*state.db).clone());
    let input = UpdateCompanyInput {
        name: payload.name,
        rfc: payload.rfc,
        line_of_business: payload.line_of_business,
        destination: payload.destination,
    };
    match repo.update_company(id, input).await {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(e) => map_company_error(e),
    }
}

/// DELETE /companies/{id} - Remove a company.
async fn delete_company(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CompanyRepository::new((*state.db).clone());
    match repo.delete_company(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_company_error(e),
    }
}
