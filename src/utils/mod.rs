// Utility modules for the Tably backend

pub mod auth_errors;
pub mod service_error;
pub mod validation;

pub use auth_errors::{log_auth_failure, AuthError, AuthErrorResponse};
pub use service_error::ServiceError;
pub use validation::{trim_and_validate_field, trim_optional_field};
