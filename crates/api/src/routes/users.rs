//! User management routes, restricted to admins.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use corretaje_core::password::hash_password;
use corretaje_db::{
    entities::sea_orm_active_enums::UserRole, repositories::UserError, CreateUserInput,
    SessionRepository, UpdateUserInput, UserRepository,
};

use crate::middleware::auth::AuthUser;
use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the users router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", patch(update_user))
        .route("/users/{id}", delete(delete_user))
}

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    first_name: String,
    last_name: String,
    email: String,
    role: UserRole,
    password: String,
}

#[derive(Debug, Deserialize, Default)]
struct UpdateUserRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    role: Option<UserRole>,
    password: Option<String>,
}

fn map_user_error(e: UserError) -> Response {
    match e {
        UserError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "user_not_found",
            &format!("User {id} does not exist"),
        ),
        UserError::DuplicateEmail(email) => error_response(
            StatusCode::CONFLICT,
            "duplicate_email",
            &format!("Email '{email}' is already registered"),
        ),
        UserError::Database(e) => internal_error("Database error", &e),
    }
}

fn require_admin(auth: &AuthUser) -> Option<Response> {
    if auth.role() == "admin" {
        None
    } else {
        Some(error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Admin role required",
        ))
    }
}

/// POST /users - Create a user. Admin only.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Some(denied) = require_admin(&auth) {
        return denied;
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => return internal_error("Failed to hash password", &e),
    };

    let repo = UserRepository::new((*state.db).clone());
    let input = CreateUserInput {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        role: payload.role,
        password_hash,
    };
    match repo.create_user(input).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => map_user_error(e),
    }
}

/// GET /users - List users. Admin only.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Some(denied) = require_admin(&auth) {
        return denied;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => internal_error("Failed to list users", &e),
    }
}

/// GET /users/{id} - Fetch one user. Admin only.
async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Some(denied) = require_admin(&auth) {
        return denied;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "user_not_found",
            &format!("User {id} does not exist"),
        ),
        Err(e) => internal_error("Failed to fetch user", &e),
    }
}

/// PATCH /users/{id} - Update a user. Admin only.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if let Some(denied) = require_admin(&auth) {
        return denied;
    }

    let password_hash = match payload.password {
        Some(password) => match hash_password(&password) {
            Ok(h) => Some(h),
            Err(e) => return internal_error("Failed to hash password", &e),
        },
        None => None,
    };

    let password_changed = password_hash.is_some();
    let repo = UserRepository::new((*state.db).clone());
    let input = UpdateUserInput {
        first_name: payload.first_name,
        last_name: payload.last_name,
        role: payload.role,
        password_hash,
    };
    match repo.update_user(id, input).await {
        Ok(user) => {
            // A password change invalidates every open session for the user.
            if password_changed {
                let sessions = SessionRepository::new((*state.db).clone());
                if let Err(e) = sessions.revoke_all_user_sessions(id).await {
                    return internal_error("Failed to revoke sessions", &e);
                }
            }
            (StatusCode::OK, Json(user)).into_response()
        }
        Err(e) => map_user_error(e),
    }
}

/// DELETE /users/{id} - Remove a user. Admin only.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Some(denied) = require_admin(&auth) {
        return denied;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.delete_user(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_user_error(e),
    }
}
