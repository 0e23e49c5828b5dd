// Authentication middleware for protected routes
// Validates JWT tokens and injects AuthenticatedUser + TenantContext into
// request extensions

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::{AuthenticatedUser, TenantContext},
};

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "success": false,
            "message": message
        })),
    )
        .into_response()
}

/// Middleware function that validates JWT tokens and adds the request-scoped
/// identity to extensions
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // Extract the Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return unauthorized("Missing or invalid authorization header"),
    };

    // Validate the token using JwtService from AppState
    match app_state.jwt_service.validate_access_token(token) {
        Ok(claims) => {
            // Tenant scoping relies on these ids; a token with malformed ids
            // is rejected outright
            let (user_id, tenant_id) = match (
                Uuid::parse_str(&claims.sub),
                Uuid::parse_str(&claims.tenant_id),
            ) {
                (Ok(u), Ok(t)) => (u, t),
                _ => {
                    tracing::warn!("Access token carried malformed subject or tenant id");
                    return unauthorized("Invalid or expired token");
                },
            };

            let auth_user = AuthenticatedUser {
                user_id: claims.sub,
                token_id: claims.jti,
                email: claims.email,
                tenant_id: claims.tenant_id,
                role: claims.role,
                exp: claims.exp,
            };

            request.extensions_mut().insert(auth_user);
            request
                .extensions_mut()
                .insert(TenantContext { tenant_id, user_id });

            next.run(request).await
        },
        Err(e) => {
            tracing::warn!("JWT validation failed: {}", e);
            unauthorized("Invalid or expired token")
        },
    }
}

/// Extractor for AuthenticatedUser from request extensions
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "success": false,
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

/// Extractor for TenantContext from request extensions
impl FromRequestParts<AppState> for TenantContext {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .copied()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "success": false,
                        "message": "Authentication required"
                    })),
                )
            })
    }
}
