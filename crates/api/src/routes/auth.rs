//! Authentication routes for login, token refresh, and logout.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use corretaje_core::password::verify_password;
use corretaje_db::{SessionRepository, UserRepository};
use corretaje_shared::{LoginRequest, TokenPair};

use crate::routes::{error_response, internal_error};
use crate::AppState;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for unknown email");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            );
        }
        Err(e) => return internal_error("Database error during login", &e),
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            );
        }
        Err(e) => return internal_error("Password verification error", &e),
    }

    let role = user.role.as_str();
    let access_token = match state.jwt_service.generate_access_token(user.id, role) {
        Ok(t) => t,
        Err(e) => return internal_error("Failed to generate access token", &e),
    };
    let refresh_token = match state.jwt_service.generate_refresh_token(user.id, role) {
        Ok(t) => t,
        Err(e) => return internal_error("Failed to generate refresh token", &e),
    };

    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at =
        chrono::Utc::now() + chrono::Duration::days(state.jwt_service.refresh_token_expires_days());
    if let Err(e) = session_repo.create(user.id, &refresh_token, expires_at).await {
        return internal_error("Failed to persist session", &e);
    }

    info!(user_id = %user.id, "User logged in");

    let tokens = TokenPair::new(
        access_token,
        refresh_token,
        state.jwt_service.access_token_expires_in(),
    );
    (
        StatusCode::OK,
        Json(json!({
            "user": {
                "id": user.id,
                "email": user.email,
                "first_name": user.first_name,
                "last_name": user.last_name,
                "role": role,
            },
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
            "expires_in": tokens.expires_in,
        })),
    )
        .into_response()
}

/// POST /auth/refresh - Rotate the refresh token and issue a new pair.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(_) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or expired refresh token",
            );
        }
    };

    let session_repo = SessionRepository::new((*state.db).clone());
    let session = match session_repo.find_by_token(&payload.refresh_token).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Refresh token is not associated with an active session",
            );
        }
        Err(e) => return internal_error("Database error during refresh", &e),
    };

    if session.expires_at < chrono::Utc::now() {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "token_expired",
            "Refresh token has expired",
        );
    }

    let user_id = claims.user_id();
    let access_token = match state.jwt_service.generate_access_token(user_id, &claims.role) {
        Ok(t) => t,
        Err(e) => return internal_error("Failed to generate access token", &e),
    };
    let refresh_token = match state.jwt_service.generate_refresh_token(user_id, &claims.role) {
        Ok(t) => t,
        Err(e) => return internal_error("Failed to generate refresh token", &e),
    };

    // Rotate: the presented token stops working, the new one gets a session.
    if let Err(e) = session_repo.revoke(session.id).await {
        return internal_error("Failed to revoke session", &e);
    }
    let expires_at =
        chrono::Utc::now() + chrono::Duration::days(state.jwt_service.refresh_token_expires_days());
    if let Err(e) = session_repo.create(user_id, &refresh_token, expires_at).await {
        return internal_error("Failed to persist session", &e);
    }

    let tokens = TokenPair::new(
        access_token,
        refresh_token,
        state.jwt_service.access_token_expires_in(),
    );
    (StatusCode::OK, Json(tokens)).into_response()
}

/// POST /auth/logout - Revoke the presented refresh token.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());
    match session_repo.revoke_by_token(&payload.refresh_token).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => internal_error("Failed to revoke session", &e),
    }
}
