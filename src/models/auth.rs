// Token claims structures for the authentication layer

use serde::{Deserialize, Serialize};

/// Access token claims
/// Carries the user identity plus the tenant scope every request runs under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenClaims {
    /// User ID (subject)
    pub sub: String,

    /// JWT ID (UUID format)
    pub jti: String,

    /// User email address
    pub email: String,

    /// Owning tenant ID
    pub tenant_id: String,

    /// User role within the tenant (owner, manager, staff, cashier)
    pub role: String,

    /// Audience (aud)
    pub aud: String,

    /// Issuer (iss)
    pub iss: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: u64,

    /// Expires at timestamp (Unix epoch seconds)
    pub exp: u64,
}

/// Refresh token claims
/// Minimal on purpose: the subject is re-resolved against the database on use
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshTokenClaims {
    /// User ID (subject)
    pub sub: String,

    /// JWT ID (UUID format)
    pub jti: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: u64,

    /// Expires at timestamp (Unix epoch seconds)
    pub exp: u64,
}

impl AccessTokenClaims {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.exp < now
    }
}

impl RefreshTokenClaims {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_access_claims() -> AccessTokenClaims {
        AccessTokenClaims {
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            email: "owner@example.com".to_string(),
            tenant_id: Uuid::new_v4().to_string(),
            role: "owner".to_string(),
            aud: "tably.app".to_string(),
            iss: "tably.app".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        }
    }

    #[test]
    fn test_access_token_claims_serialization() {
        let claims = sample_access_claims();

        let json = serde_json::to_string(&claims).expect("Should serialize");
        let deserialized: AccessTokenClaims =
            serde_json::from_str(&json).expect("Should deserialize");

        assert_eq!(claims, deserialized);
    }

    #[test]
    fn test_access_token_claim_fields() {
        let claims = sample_access_claims();

        let json_value = serde_json::to_value(&claims).expect("Should serialize");
        let obj = json_value.as_object().expect("Should be object");

        assert_eq!(obj.len(), 9, "AccessTokenClaims should have exactly 9 fields");
        assert!(obj.contains_key("sub"));
        assert!(obj.contains_key("jti"));
        assert!(obj.contains_key("email"));
        assert!(obj.contains_key("tenant_id"));
        assert!(obj.contains_key("role"));
        assert!(obj.contains_key("aud"));
        assert!(obj.contains_key("iss"));
        assert!(obj.contains_key("iat"));
        assert!(obj.contains_key("exp"));
    }

    #[test]
    fn test_refresh_token_claim_fields() {
        let claims = RefreshTokenClaims {
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: 1_700_000_000,
            exp: 1_700_604_800,
        };

        let json_value = serde_json::to_value(&claims).expect("Should serialize");
        let obj = json_value.as_object().expect("Should be object");

        assert_eq!(obj.len(), 4, "RefreshTokenClaims should have exactly 4 fields");
        assert!(obj.contains_key("sub"));
        assert!(obj.contains_key("jti"));
        assert!(obj.contains_key("iat"));
        assert!(obj.contains_key("exp"));
    }

    #[test]
    fn test_token_expiry_check() {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let mut claims = sample_access_claims();
        claims.iat = now - 3600;
        claims.exp = now - 1;
        assert!(claims.is_expired(), "Token should be expired");

        claims.iat = now;
        claims.exp = now + 3600;
        assert!(!claims.is_expired(), "Token should not be expired");
    }
}
