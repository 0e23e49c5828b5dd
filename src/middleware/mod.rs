// Middleware modules for the Tably backend
// JWT validation plus the request-scoped tenant context it produces

pub mod auth;
pub mod auth_middleware;
pub mod cors;

// Re-export auth types
pub use auth::{AuthenticatedUser, TenantContext};
pub use auth_middleware::auth_middleware;
pub use cors::dynamic_cors_middleware;
