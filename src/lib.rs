// Library exports for the Tably backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, CONFIG};
pub use db::DieselPool;
pub use middleware::{auth_middleware, AuthenticatedUser, TenantContext};
pub use models::auth::{AccessTokenClaims, RefreshTokenClaims};
pub use services::{
    AuthPayload, AuthService, FeatureService, JwtConfig, JwtError, JwtService, OrderService,
};
pub use utils::{AuthError, ServiceError};

// Re-export individual handlers for direct use
pub use handlers::auth::{get_current_user, google_login, refresh_token};
pub use handlers::orders::{create_order, get_order, list_orders, update_order_status};

// Library initialization function for external consumers
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    use std::sync::Arc;
    use tracing::info;

    // Load environment
    dotenv::dotenv().ok();

    // Initialize config
    let config = app_config::config();

    // Initialize database pool
    info!("Initializing database pool...");
    let db_config = db::DieselDatabaseConfig::default();
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    // Run migrations if enabled
    if migrations::should_run_migrations() {
        info!("Running embedded migrations...");
        migrations::run_migrations()
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    let jwt_service = Arc::new(services::JwtService::from_env());

    Ok(AppState {
        config: Arc::new(config.clone()),
        diesel_pool,
        jwt_service,
        max_connections,
    })
}

/// Build the complete application router
pub fn build_router(state: AppState) -> axum::Router {
    use axum::routing::get;
    use axum::Router;
    use tower_http::trace::TraceLayer;

    let auth_router = handlers::auth_routes().merge(
        handlers::protected_auth_routes().route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        )),
    );

    let order_router = handlers::order_routes().route_layer(
        axum::middleware::from_fn_with_state(state.clone(), middleware::auth_middleware),
    );

    let mut api = Router::new()
        .nest("/auth", auth_router)
        .nest("/orders", order_router)
        .route("/health", get(health_check));

    if state.config.enable_swagger_ui {
        api = api.nest("/docs", handlers::docs_routes());
    }

    Router::new()
        .nest("/api/v1", api)
        .layer(axum::middleware::from_fn(
            middleware::dynamic_cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let mut overall_healthy = true;
    let timestamp = chrono::Utc::now().to_rfc3339();

    // Check PostgreSQL
    let postgres_health = match db::check_diesel_health(&state.diesel_pool).await {
        Ok(_) => serde_json::json!({
            "status": "healthy",
            "max_connections": state.max_connections,
            "error": null
        }),
        Err(e) => {
            overall_healthy = false;
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            })
        },
    };

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "tably-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
