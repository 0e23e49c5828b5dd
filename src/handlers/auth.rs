// Authentication handlers: Google login, token refresh, current user
// Supports both web (http-only cookie) and mobile (JSON body) refresh tokens

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::{
    extract::cookie::{Cookie, CookieJar, SameSite},
    headers::UserAgent,
    TypedHeader,
};
use serde::{Deserialize, Serialize};
use time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::{tenant::TenantResponse, user::UserResponse},
    services::auth::{AuthPayload, AuthService},
    utils::{auth_errors::AuthError, log_auth_failure, trim_and_validate_field},
};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

/// Login request carrying an externally verified Google identity.
/// The id_token is accepted but NOT verified against the issuer here.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[schema(example = json!({
    "email": "owner@example.com",
    "name": "Priya",
    "google_id": "108234567890123456789",
    "id_token": "eyJhbGciOi..."
}))]
pub struct GoogleLoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 320, message = "Email must be less than 320 characters"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Google ID must be between 1 and 255 characters"
    ))]
    pub google_id: String,

    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    // Optional for web clients (cookie is used instead)
    pub refresh_token: Option<String>,
}

/// Current-user projection for GET /auth/me
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: UserResponse,
    pub tenant: TenantResponse,
}

// =============================================================================
// HELPERS
// =============================================================================

/// Helper function to create standardized auth error responses
fn create_auth_error_response(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "success": false,
            "message": message
        })),
    )
        .into_response()
}

/// Helper function to create a refresh token cookie
fn create_refresh_token_cookie(
    token: String,
    config: &crate::app_config::AppConfig,
) -> Cookie<'static> {
    Cookie::build(("refresh_token", token))
        .path("/")
        .http_only(true)
        .secure(config.is_production())
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(config.jwt.refresh_expiry as i64))
        .build()
}

/// Helper function to create a cookie that deletes the refresh token
fn create_delete_refresh_cookie(config: &crate::app_config::AppConfig) -> Cookie<'static> {
    Cookie::build(("refresh_token", ""))
        .path("/")
        .http_only(true)
        .secure(config.is_production())
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(-1)) // Negative max_age deletes the cookie
        .build()
}

/// Validate JWT token format (must have exactly 3 parts separated by dots)
fn is_valid_jwt_format(token: &str) -> bool {
    token.split('.').count() == 3
}

/// Extract refresh token from cookie (web) or JSON body (mobile)
fn extract_refresh_token(jar: &CookieJar, body: &axum::body::Bytes) -> Result<String, Response> {
    // Try cookie first (web clients)
    if let Some(cookie) = jar.get("refresh_token") {
        let token = cookie.value();
        if !is_valid_jwt_format(token) {
            return Err(create_auth_error_response("Invalid refresh token format"));
        }
        return Ok(token.to_string());
    }

    // Fall back to JSON body (mobile clients)
    if body.is_empty() {
        return Err(create_auth_error_response("Refresh token not provided"));
    }

    match serde_json::from_slice::<RefreshRequest>(body) {
        Ok(req) => {
            if let Some(token) = req.refresh_token {
                if !is_valid_jwt_format(&token) {
                    return Err(create_auth_error_response("Invalid refresh token format"));
                }
                Ok(token)
            } else {
                Err(create_auth_error_response("Refresh token not provided"))
            }
        },
        Err(_) => Err(create_auth_error_response("Invalid JSON body")),
    }
}

// =============================================================================
// AUTHENTICATION HANDLERS
// =============================================================================

/// POST /auth/google - Log in with a Google identity, onboarding a tenant on
/// first sight of the email
#[utoipa::path(
    post,
    path = "/v1/auth/google",
    tag = "Auth",
    operation_id = "googleLogin",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthPayload),
        (status = 400, description = "Bad request - validation failed"),
        (status = 403, description = "Forbidden - account inactive")
    )
)]
pub async fn google_login(
    State(state): State<AppState>,
    user_agent: Option<TypedHeader<UserAgent>>,
    jar: CookieJar,
    Json(request): Json<GoogleLoginRequest>,
) -> Response {
    let user_agent = user_agent.map(|TypedHeader(ua)| ua.to_string());

    if let Err(e) = request.validate() {
        return AuthError::ValidationError(e.to_string()).into_response();
    }

    let email = match trim_and_validate_field(&request.email, true) {
        Ok(v) => v.to_lowercase(),
        Err(_) => {
            return AuthError::ValidationError("Email is required".to_string()).into_response()
        },
    };
    let name = match trim_and_validate_field(&request.name, true) {
        Ok(v) => v,
        Err(_) => {
            return AuthError::ValidationError("Name is required".to_string()).into_response()
        },
    };

    let service = AuthService::new(&state);
    match service
        .google_login(&email, &name, &request.google_id)
        .await
    {
        Ok(payload) => {
            let cookie =
                create_refresh_token_cookie(payload.refresh_token.clone(), state.config.as_ref());
            (jar.add(cookie), Json(payload)).into_response()
        },
        Err(e) => {
            log_auth_failure(&email, &e, user_agent.as_deref());
            e.into_response()
        },
    }
}

/// POST /auth/refresh - Rotate the refresh token and issue a new pair
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    tag = "Auth",
    operation_id = "refreshToken",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = AuthPayload),
        (status = 401, description = "Invalid, expired, or superseded refresh token"),
        (status = 404, description = "Token subject no longer exists")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: axum::body::Bytes,
) -> Response {
    let token = match extract_refresh_token(&jar, &body) {
        Ok(token) => token,
        Err(response) => return response,
    };

    let service = AuthService::new(&state);
    match service.refresh(&token).await {
        Ok(payload) => {
            let cookie =
                create_refresh_token_cookie(payload.refresh_token.clone(), state.config.as_ref());
            (jar.add(cookie), Json(payload)).into_response()
        },
        Err(e @ (AuthError::InvalidToken | AuthError::ExpiredToken)) => {
            // Drop the dead cookie so web clients stop retrying it
            let jar = jar.add(create_delete_refresh_cookie(state.config.as_ref()));
            (jar, e.into_response()).into_response()
        },
        Err(e) => e.into_response(),
    }
}

/// GET /auth/me - Return the authenticated user's own projections
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Auth",
    operation_id = "getCurrentUser",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User or tenant no longer exists")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Response {
    let user_id = match Uuid::parse_str(&auth_user.user_id) {
        Ok(id) => id,
        Err(_) => return AuthError::InvalidToken.into_response(),
    };

    let service = AuthService::new(&state);
    match service.current_user(user_id).await {
        Ok((user, tenant)) => Json(MeResponse { user, tenant }).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_format_check() {
        assert!(is_valid_jwt_format("aaa.bbb.ccc"));
        assert!(!is_valid_jwt_format("aaa.bbb"));
        assert!(!is_valid_jwt_format(""));
        assert!(!is_valid_jwt_format("aaa.bbb.ccc.ddd"));
    }

    #[test]
    fn test_google_login_request_validation() {
        let valid = GoogleLoginRequest {
            email: "owner@example.com".to_string(),
            name: "Priya".to_string(),
            google_id: "108234567890123456789".to_string(),
            id_token: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = GoogleLoginRequest {
            email: "not-an-email".to_string(),
            name: "Priya".to_string(),
            google_id: "108234567890123456789".to_string(),
            id_token: None,
        };
        assert!(bad_email.validate().is_err());

        let empty_name = GoogleLoginRequest {
            email: "owner@example.com".to_string(),
            name: String::new(),
            google_id: "108234567890123456789".to_string(),
            id_token: None,
        };
        assert!(empty_name.validate().is_err());
    }
}
