// User database model
// Users belong to exactly one tenant; the first user of a tenant is its owner

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::users;

/// Placeholder stored for social-login accounts that carry no password
pub const SOCIAL_LOGIN_PASSWORD_HASH: &str = "external-auth";

/// Role of a user within its tenant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    Owner,
    Manager,
    Staff,
    Cashier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Manager => "manager",
            UserRole::Staff => "staff",
            UserRole::Cashier => "cashier",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(UserRole::Owner),
            "manager" => Ok(UserRole::Manager),
            "staff" => Ok(UserRole::Staff),
            "cashier" => Ok(UserRole::Cashier),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// External identity provider that authenticated the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthProvider {
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
        }
    }
}

impl FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(AuthProvider::Google),
            _ => Err(format!("Invalid auth provider: {}", s)),
        }
    }
}

/// User database model - queryable from database
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub google_id: String,
    pub role: String,
    pub auth_provider: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub google_id: String,
    pub role: String,
    pub auth_provider: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub password_hash: String,
}

impl NewUser {
    /// Build the owner user created alongside a brand-new tenant
    pub fn owner(tenant_id: Uuid, email: &str, full_name: &str, google_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            email: email.to_string(),
            full_name: full_name.to_string(),
            google_id: google_id.to_string(),
            role: UserRole::Owner.as_str().to_string(),
            auth_provider: AuthProvider::Google.as_str().to_string(),
            is_active: true,
            last_login_at: Some(Utc::now()),
            password_hash: SOCIAL_LOGIN_PASSWORD_HASH.to_string(),
        }
    }
}

/// Errors for user operations
#[derive(thiserror::Error, Debug)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("User not found")]
    NotFound,
}

impl User {
    /// Find user by ID
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .first::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UserError::NotFound,
                _ => UserError::Database(e),
            })
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;
        use diesel::PgTextExpressionMethods;

        users
            .filter(email.ilike(email_str))
            .first::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UserError::NotFound,
                _ => UserError::Database(e),
            })
    }

    /// Create a new user. Returns the raw diesel error so callers composing
    /// transactions can inspect constraint violations (unique email).
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_user: NewUser,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::users::dsl::*;

        diesel::insert_into(users)
            .values(&new_user)
            .get_result::<User>(conn)
            .await
    }

    /// Record a successful login
    pub async fn touch_last_login(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set((last_login_at.eq(Some(Utc::now())), updated_at.eq(Utc::now())))
            .get_result::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UserError::NotFound,
                _ => UserError::Database(e),
            })
    }

    /// Persist a freshly issued refresh token, overwriting any prior value.
    /// The previous token stops working the moment this commits.
    pub async fn store_refresh_token(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set((
                refresh_token.eq(Some(token)),
                refresh_token_expires_at.eq(Some(expires_at)),
                updated_at.eq(Utc::now()),
            ))
            .get_result::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UserError::NotFound,
                _ => UserError::Database(e),
            })
    }

    /// Get role as enum, defaulting to Staff on bad data
    pub fn role_enum(&self) -> UserRole {
        UserRole::from_str(&self.role).unwrap_or_else(|e| {
            tracing::warn!("Invalid role '{}' for user {}: {}", self.role, self.id, e);
            UserRole::Staff
        })
    }
}

/// User projection returned to API clients
/// The refresh token and password hash never leave the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub tenant_id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            tenant_id: user.tenant_id.to_string(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
            is_active: user.is_active,
            last_login_at: user.last_login_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_conversion() {
        assert_eq!(UserRole::Owner.as_str(), "owner");
        assert_eq!(UserRole::Cashier.as_str(), "cashier");

        assert_eq!(UserRole::from_str("owner"), Ok(UserRole::Owner));
        assert_eq!(UserRole::from_str("manager"), Ok(UserRole::Manager));
        assert_eq!(UserRole::from_str("staff"), Ok(UserRole::Staff));
        assert!(UserRole::from_str("admin").is_err());
    }

    #[test]
    fn test_auth_provider_conversion() {
        assert_eq!(AuthProvider::Google.as_str(), "google");
        assert_eq!(AuthProvider::from_str("google"), Ok(AuthProvider::Google));
        assert!(AuthProvider::from_str("facebook").is_err());
    }

    #[test]
    fn test_owner_user_defaults() {
        let tenant_id = Uuid::new_v4();
        let user = NewUser::owner(tenant_id, "owner@example.com", "Priya", "google-123");

        assert_eq!(user.tenant_id, tenant_id);
        assert_eq!(user.email, "owner@example.com");
        assert_eq!(user.role, "owner");
        assert_eq!(user.auth_provider, "google");
        assert!(user.is_active);
        assert!(user.last_login_at.is_some());
        assert_eq!(user.password_hash, SOCIAL_LOGIN_PASSWORD_HASH);
    }

    #[test]
    fn test_user_response_hides_credentials() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
            full_name: "Priya".to_string(),
            google_id: "google-123".to_string(),
            role: "owner".to_string(),
            auth_provider: "google".to_string(),
            is_active: true,
            last_login_at: Some(now),
            refresh_token: Some("secret-token".to_string()),
            refresh_token_expires_at: Some(now),
            password_hash: SOCIAL_LOGIN_PASSWORD_HASH.to_string(),
            created_at: now,
            updated_at: now,
        };

        let response = UserResponse::from(&user);
        let json = serde_json::to_string(&response).expect("Should serialize");

        assert!(!json.contains("secret-token"));
        assert!(!json.contains("password"));
        assert_eq!(response.role, "owner");
    }
}
