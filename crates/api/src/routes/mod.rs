//! API route definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Json, Router};
use serde_json::json;

use crate::{middleware::auth::auth_middleware, AppState};

pub mod auth;
pub mod bank_movements;
pub mod banks;
pub mod broker_commissions;
pub mod brokers;
pub mod clients;
pub mod companies;
pub mod health;
pub mod invoices;
pub mod operations;
pub mod payments;
pub mod reconciliation;
pub mod reports;
pub mod returns;
pub mod schemes;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(operations::routes())
        .merge(returns::routes())
        .merge(broker_commissions::routes())
        .merge(clients::routes())
        .merge(companies::routes())
        .merge(banks::routes())
        .merge(brokers::routes())
        .merge(schemes::routes())
        .merge(invoices::routes())
        .merge(bank_movements::routes())
        .merge(payments::routes())
        .merge(reconciliation::routes())
        .merge(reports::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Deserializer for patch fields where absent, null, and a value are three
/// distinct states: absent stays `None`, null becomes `Some(None)`.
///
/// Use with `#[serde(default, deserialize_with = "crate::routes::double_option")]`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}

/// Standard error body: `{"error": code, "message": text}`.
pub(crate) fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

/// 500 with a generic body; the cause goes to the log, not the client.
pub(crate) fn internal_error(context: &str, err: &dyn std::fmt::Display) -> Response {
    tracing::error!(error = %err, "{context}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An internal error occurred",
    )
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::double_option")]
        reference: Option<Option<String>>,
    }

    #[test]
    fn absent_field_stays_none() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.reference, None);
    }

    #[test]
    fn null_field_clears_the_value() {
        let patch: Patch = serde_json::from_str(r#"{"reference": null}"#).unwrap();
        assert_eq!(patch.reference, Some(None));
    }

    #[test]
    fn present_field_sets_the_value() {
        let patch: Patch = serde_json::from_str(r#"{"reference": "REF-1"}"#).unwrap();
        assert_eq!(patch.reference, Some(Some("REF-1".to_string())));
    }
}
