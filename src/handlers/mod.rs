// HTTP handlers and route builders

pub mod auth;
pub mod docs;
pub mod orders;

use crate::app::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/google", post(auth::google_login))
        .route("/refresh", post(auth::refresh_token))
}

/// Authentication routes that require a valid access token
pub fn protected_auth_routes() -> Router<AppState> {
    Router::new().route("/me", get(auth::get_current_user))
}

/// Order routes; all require a valid access token
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create_order).get(orders::list_orders))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/status", put(orders::update_order_status))
}

/// API documentation routes
pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(docs::serve_swagger_ui))
        .route("/openapi.json", get(docs::serve_openapi_spec))
}
