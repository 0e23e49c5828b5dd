// JWT token service with HS256 algorithm
// Issues and validates access and refresh tokens with separate signing keys.
// Pure: no storage side effects; rotation state lives on the user row.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::{AccessTokenClaims, RefreshTokenClaims};

// Error types for JWT operations
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(String),

    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidToken => JwtError::InvalidToken,
            _ => JwtError::EncodingError(err.to_string()),
        }
    }
}

// JWT Configuration with separate keys for access and refresh tokens
#[derive(Clone)]
pub struct JwtConfig {
    pub access_token_expiry: u64,  // seconds, minutes-to-hours scale
    pub refresh_token_expiry: u64, // seconds, days scale
    pub algorithm: Algorithm,      // HS256 (HMAC SHA-256)

    // JWT validation settings
    pub audience: String,
    pub issuer: String,

    // Separate keys for access tokens
    pub access_encoding_key: EncodingKey,
    pub access_decoding_key: DecodingKey,

    // Separate keys for refresh tokens
    pub refresh_encoding_key: EncodingKey,
    pub refresh_decoding_key: DecodingKey,

    // Key versioning for rotation
    pub key_version: u32,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("access_encoding_key", &"<redacted>")
            .field("access_decoding_key", &"<redacted>")
            .field("refresh_encoding_key", &"<redacted>")
            .field("refresh_decoding_key", &"<redacted>")
            .field("key_version", &self.key_version)
            .finish()
    }
}

impl JwtConfig {
    /// Build JWT config from provided parameters - shared logic for from_env and tests
    pub fn build_from_params(
        access_secret: &str,
        refresh_secret: &str,
        access_expiry: u64,
        refresh_expiry: u64,
        audience: String,
        issuer: String,
        key_version: u32,
    ) -> Self {
        let access_encoding_key = EncodingKey::from_secret(access_secret.as_bytes());
        let access_decoding_key = DecodingKey::from_secret(access_secret.as_bytes());

        let refresh_encoding_key = EncodingKey::from_secret(refresh_secret.as_bytes());
        let refresh_decoding_key = DecodingKey::from_secret(refresh_secret.as_bytes());

        JwtConfig {
            access_token_expiry: access_expiry,
            refresh_token_expiry: refresh_expiry,
            algorithm: Algorithm::HS256,
            audience,
            issuer,
            access_encoding_key,
            access_decoding_key,
            refresh_encoding_key,
            refresh_decoding_key,
            key_version,
        }
    }

    /// Create JWT config from centralized app configuration
    pub fn from_env() -> Self {
        let crate::app_config::JwtConfig {
            access_secret,
            refresh_secret,
            access_expiry,
            refresh_expiry,
            audience,
            issuer,
            key_version,
        } = &crate::CONFIG.jwt;

        Self::build_from_params(
            access_secret,
            refresh_secret,
            *access_expiry,
            *refresh_expiry,
            audience.clone(),
            issuer.clone(),
            *key_version,
        )
    }
}

// JWT service: pure function of its signing keys and the input
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    /// Create new JWT service with configuration
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Create JWT service from environment
    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }

    /// Access token lifetime in seconds, for `expires_in` response fields
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_expiry(&self) -> u64 {
        self.config.refresh_token_expiry
    }

    fn now_epoch() -> Result<u64, JwtError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| JwtError::KeyGenerationError(e.to_string()))
    }

    /// Generate an access token carrying the user's identity and tenant scope
    pub fn generate_access_token(
        &self,
        user_id: &str,
        email: &str,
        tenant_id: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        let now = Self::now_epoch()?;

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            email: email.to_string(),
            tenant_id: tenant_id.to_string(),
            role: role.to_string(),
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.access_token_expiry,
        };

        let mut header = Header::new(self.config.algorithm);
        header.kid = Some(self.config.key_version.to_string());

        encode(&header, &claims, &self.config.access_encoding_key).map_err(Into::into)
    }

    /// Generate a refresh token carrying only the user id
    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String, JwtError> {
        let now = Self::now_epoch()?;

        let claims = RefreshTokenClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.config.refresh_token_expiry,
        };

        let mut header = Header::new(self.config.algorithm);
        header.kid = Some(self.config.key_version.to_string());

        encode(&header, &claims, &self.config.refresh_encoding_key).map_err(Into::into)
    }

    /// Validates an access token and returns the decoded claims
    ///
    /// # Errors
    /// * `JwtError::TokenExpired` - Token has expired (leeway 0, strict)
    /// * `JwtError::InvalidToken` / `JwtError::EncodingError` - signature,
    ///   audience, issuer, or format problems
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data =
            decode::<AccessTokenClaims>(token, &self.config.access_decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Validates a refresh token signature and expiry and returns the claims
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let token_data =
            decode::<RefreshTokenClaims>(token, &self.config.refresh_decoding_key, &validation)
                .map_err(|e| match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
                    _ => JwtError::EncodingError(e.to_string()),
                })?;

        Ok(token_data.claims)
    }

    /// True iff the refresh token's signature verifies and it has not expired.
    /// Never errors: malformed input just reports invalid.
    pub fn is_refresh_token_valid(&self, token: &str) -> bool {
        self.validate_refresh_token(token).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::build_from_params(
            "test-access-secret-hs256-minimum-32-characters-long",
            "test-refresh-secret-hs256-minimum-32-characters-long",
            3600,
            604800,
            "test.tably.app".to_string(),
            "test.tably.app".to_string(),
            1,
        )
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = JwtService::new(test_config());
        let user_id = Uuid::new_v4().to_string();
        let tenant_id = Uuid::new_v4().to_string();

        let token = service
            .generate_access_token(&user_id, "owner@example.com", &tenant_id, "owner")
            .expect("Failed to generate access token");

        let claims = service
            .validate_access_token(&token)
            .expect("Failed to validate access token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "owner@example.com");
        assert_eq!(claims.tenant_id, tenant_id);
        assert_eq!(claims.role, "owner");
        assert_eq!(claims.aud, "test.tably.app");
        assert_eq!(claims.iss, "test.tably.app");
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let service = JwtService::new(test_config());
        let user_id = Uuid::new_v4().to_string();

        let token = service
            .generate_refresh_token(&user_id)
            .expect("Failed to generate refresh token");

        let claims = service
            .validate_refresh_token(&token)
            .expect("Failed to validate refresh token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp, claims.iat + 604800);
    }

    #[test]
    fn test_refresh_validity_check_never_errors() {
        let service = JwtService::new(test_config());

        assert!(!service.is_refresh_token_valid(""));
        assert!(!service.is_refresh_token_valid("garbage"));
        assert!(!service.is_refresh_token_valid("a.b.c"));

        // An access token is not a valid refresh token (different key)
        let access = service
            .generate_access_token("u", "e@example.com", "t", "owner")
            .unwrap();
        assert!(!service.is_refresh_token_valid(&access));

        let refresh = service.generate_refresh_token("u").unwrap();
        assert!(service.is_refresh_token_valid(&refresh));
    }

    #[test]
    fn test_token_signed_by_other_service_rejected() {
        let service = JwtService::new(test_config());
        let other = JwtService::new(JwtConfig::build_from_params(
            "another-access-secret-hs256-at-least-32-chars!",
            "another-refresh-secret-hs256-at-least-32-chars!",
            3600,
            604800,
            "test.tably.app".to_string(),
            "test.tably.app".to_string(),
            1,
        ));

        let token = other.generate_refresh_token("user").unwrap();
        assert!(service.validate_refresh_token(&token).is_err());
        assert!(!service.is_refresh_token_valid(&token));
    }
}
