// Basic JWT tests without database dependencies
// Token generation, validation, and rejection paths

use tably_backend_core::{JwtConfig, JwtError, JwtService};
use uuid::Uuid;

/// Helper to create test JWT config without relying on environment
fn create_test_jwt_config() -> JwtConfig {
    JwtConfig::build_from_params(
        "test-access-secret-hs256-minimum-32-characters-long",
        "test-refresh-secret-hs256-minimum-32-characters-long",
        3600,   // 1 hour
        604800, // 7 days
        "test.tably.app".to_string(),
        "test.tably.app".to_string(),
        1,
    )
}

#[test]
fn test_access_token_generation_and_validation() {
    let jwt_service = JwtService::new(create_test_jwt_config());

    let user_id = Uuid::new_v4().to_string();
    let tenant_id = Uuid::new_v4().to_string();

    let access_token = jwt_service
        .generate_access_token(&user_id, "owner@example.com", &tenant_id, "owner")
        .expect("Failed to generate access token");

    let claims = jwt_service
        .validate_access_token(&access_token)
        .expect("Failed to validate access token");

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "owner@example.com");
    assert_eq!(claims.tenant_id, tenant_id);
    assert_eq!(claims.role, "owner");
    assert_eq!(claims.aud, "test.tably.app");
    assert_eq!(claims.iss, "test.tably.app");
    assert_eq!(claims.exp, claims.iat + 3600);
}

#[test]
fn test_refresh_token_generation_and_validation() {
    let jwt_service = JwtService::new(create_test_jwt_config());

    let user_id = Uuid::new_v4().to_string();
    let refresh_token = jwt_service
        .generate_refresh_token(&user_id)
        .expect("Failed to generate refresh token");

    let claims = jwt_service
        .validate_refresh_token(&refresh_token)
        .expect("Failed to validate refresh token");

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.exp, claims.iat + 604800);
}

#[tokio::test]
async fn test_token_expiry_validation() {
    let jwt_config = JwtConfig::build_from_params(
        "test-access-secret-hs256-minimum-32-characters-long",
        "test-refresh-secret-hs256-minimum-32-characters-long",
        1, // 1 second expiry
        604800,
        "test.tably.app".to_string(),
        "test.tably.app".to_string(),
        1,
    );
    let jwt_service = JwtService::new(jwt_config);

    let token = jwt_service
        .generate_access_token("user-1", "expired@example.com", "tenant-1", "owner")
        .expect("Failed to generate token");

    // Verify token is initially valid
    assert!(
        jwt_service.validate_access_token(&token).is_ok(),
        "Token should be valid initially"
    );

    // Wait for token to expire (buffer for potential clock skew)
    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;

    match jwt_service.validate_access_token(&token) {
        Err(JwtError::TokenExpired) => {},
        Err(e) => panic!("Expected TokenExpired error, got: {:?}", e),
        Ok(_) => panic!("Expected token to be expired, but validation succeeded"),
    }
}

#[test]
fn test_invalid_token_validation() {
    let jwt_service = JwtService::new(create_test_jwt_config());

    let result = jwt_service.validate_access_token("invalid.jwt.token");
    assert!(result.is_err(), "Invalid token should fail validation");

    let result = jwt_service.validate_refresh_token("not even a token");
    assert!(result.is_err(), "Garbage should fail validation");
}

#[test]
fn test_refresh_validity_check_reports_invalid_without_error() {
    let jwt_service = JwtService::new(create_test_jwt_config());

    assert!(!jwt_service.is_refresh_token_valid(""));
    assert!(!jwt_service.is_refresh_token_valid("garbage"));
    assert!(!jwt_service.is_refresh_token_valid("a.b.c"));

    let refresh = jwt_service.generate_refresh_token("user-1").unwrap();
    assert!(jwt_service.is_refresh_token_valid(&refresh));
}

#[test]
fn test_access_token_rejected_as_refresh_token() {
    // Access and refresh tokens are signed with different keys; neither
    // validates as the other kind
    let jwt_service = JwtService::new(create_test_jwt_config());

    let access = jwt_service
        .generate_access_token("user-1", "a@example.com", "tenant-1", "owner")
        .unwrap();
    assert!(jwt_service.validate_refresh_token(&access).is_err());

    let refresh = jwt_service.generate_refresh_token("user-1").unwrap();
    assert!(jwt_service.validate_access_token(&refresh).is_err());
}

#[test]
fn test_token_from_other_signer_rejected() {
    let jwt_service = JwtService::new(create_test_jwt_config());
    let other_service = JwtService::new(JwtConfig::build_from_params(
        "a-completely-different-access-secret-32-chars!!",
        "a-completely-different-refresh-secret-32-chars!",
        3600,
        604800,
        "test.tably.app".to_string(),
        "test.tably.app".to_string(),
        1,
    ));

    let foreign_access = other_service
        .generate_access_token("user-1", "a@example.com", "tenant-1", "owner")
        .unwrap();
    assert!(jwt_service.validate_access_token(&foreign_access).is_err());

    let foreign_refresh = other_service.generate_refresh_token("user-1").unwrap();
    assert!(!jwt_service.is_refresh_token_valid(&foreign_refresh));
}

#[test]
fn test_audience_mismatch_rejected() {
    let jwt_service = JwtService::new(create_test_jwt_config());
    let other_audience = JwtService::new(JwtConfig::build_from_params(
        "test-access-secret-hs256-minimum-32-characters-long",
        "test-refresh-secret-hs256-minimum-32-characters-long",
        3600,
        604800,
        "someone-else.example".to_string(),
        "someone-else.example".to_string(),
        1,
    ));

    // Same keys, wrong audience/issuer
    let token = other_audience
        .generate_access_token("user-1", "a@example.com", "tenant-1", "owner")
        .unwrap();
    assert!(jwt_service.validate_access_token(&token).is_err());
}
