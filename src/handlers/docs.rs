// API documentation: OpenAPI spec + embedded Swagger UI page
// Exposed only when ENABLE_SWAGGER_UI is set

use axum::response::{Html, IntoResponse, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tably Backend API",
        description = "Multi-tenant restaurant billing backend"
    ),
    paths(
        crate::handlers::auth::google_login,
        crate::handlers::auth::refresh_token,
        crate::handlers::auth::get_current_user,
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
    ),
    components(schemas(
        crate::handlers::auth::GoogleLoginRequest,
        crate::handlers::auth::RefreshRequest,
        crate::handlers::auth::MeResponse,
        crate::services::auth::AuthPayload,
        crate::models::user::UserResponse,
        crate::models::tenant::TenantResponse,
        crate::models::order::CreateOrderRequest,
        crate::models::order::OrderItemRequest,
        crate::models::order::UpdateOrderStatusRequest,
        crate::models::order::OrderResponse,
        crate::models::order::OrderItemResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication, onboarding, and token rotation"),
        (name = "Orders", description = "Tenant-scoped order lifecycle")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serve the OpenAPI JSON specification at /api/v1/docs/openapi.json
pub async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serve Swagger UI HTML at /api/v1/docs
pub async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

// Embedded Swagger UI HTML
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tably API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body {
            margin: 0;
            padding: 0;
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        }
        #swagger-ui {
            max-width: 1460px;
            margin: 0 auto;
            padding: 20px;
        }
        .topbar {
            display: none;
        }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: '/api/v1/docs/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [SwaggerUIBundle.presets.apis],
                layout: "BaseLayout"
            });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_builds() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).expect("Spec should serialize");

        let paths = json["paths"].as_object().expect("paths object");
        assert!(paths.contains_key("/v1/auth/google"));
        assert!(paths.contains_key("/v1/auth/refresh"));
        assert!(paths.contains_key("/v1/orders"));
        assert!(paths.contains_key("/v1/orders/{id}/status"));
    }
}
