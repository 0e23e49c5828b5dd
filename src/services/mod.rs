// Services module for the Tably backend
// Business logic layer for the application

pub mod auth;
pub mod feature;
pub mod jwt;
pub mod order;

// Re-export commonly used services
pub use auth::{AuthPayload, AuthService};
pub use feature::{FeatureService, DEFAULT_FEATURES};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use order::OrderService;
