// Request-scoped identity extracted from a validated access token

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user information extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub token_id: String,
    pub email: String,
    pub tenant_id: String,
    pub role: String,
    pub exp: u64,
}

/// Tenant scope for the current request.
///
/// Populated by the auth middleware before any service method runs and
/// carried in the request extensions, so it can never leak across concurrent
/// requests the way a shared mutable global would.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
}
