// Authentication business logic
// First login bootstraps a tenant and its owner atomically; every login
// rotates the refresh token stored on the user row.

use chrono::{Duration, Utc};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use serde::Serialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DieselPool,
    models::{
        tenant::{NewTenant, Tenant, TenantError, TenantResponse},
        user::{NewUser, User, UserError, UserResponse},
    },
    services::{feature::FeatureService, jwt::JwtService},
    utils::auth_errors::AuthError,
};

/// Response payload for login and refresh
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
    pub user: UserResponse,
    pub tenant: TenantResponse,
}

pub struct AuthService {
    pool: DieselPool,
    jwt: Arc<JwtService>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(state: &crate::app::AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
            jwt: state.jwt_service.clone(),
        }
    }

    async fn conn(
        &self,
    ) -> Result<
        bb8::PooledConnection<
            '_,
            diesel_async::pooled_connection::AsyncDieselConnectionManager<AsyncPgConnection>,
        >,
        AuthError,
    > {
        self.pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    /// Log a user in with an externally verified Google identity.
    ///
    /// The identity token itself is NOT verified here; production deployments
    /// must check it against the issuer before trusting email/name.
    ///
    /// A never-seen email creates a tenant, its owner user, and the default
    /// feature set in one transaction. A repeated login only bumps the
    /// last-login timestamp. Either way a fresh token pair is issued and the
    /// refresh token is persisted on the user row, superseding any prior one.
    pub async fn google_login(
        &self,
        email: &str,
        name: &str,
        google_id: &str,
    ) -> Result<AuthPayload, AuthError> {
        let mut conn = self.conn().await?;

        let user = match User::find_by_email(&mut conn, email).await {
            Ok(existing) => User::touch_last_login(&mut conn, existing.id)
                .await
                .map_err(map_user_error)?,
            Err(UserError::NotFound) => {
                self.onboard_tenant(&mut conn, email, name, google_id)
                    .await?
            },
            Err(e) => return Err(AuthError::DatabaseError(e.to_string())),
        };

        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }

        let tenant = Tenant::find_by_id(&mut conn, user.tenant_id)
            .await
            .map_err(map_tenant_error)?;

        self.issue_token_pair(&mut conn, user, tenant).await
    }

    /// Exchange a refresh token for a new token pair, rotating the stored one.
    ///
    /// A refresh token is usable exactly once between rotations: the presented
    /// value must byte-match the token currently stored on the user row, and
    /// the stored expiry must not have passed. A superseded token is rejected
    /// even though its signature still verifies.
    pub async fn refresh(&self, presented: &str) -> Result<AuthPayload, AuthError> {
        if !self.jwt.is_refresh_token_valid(presented) {
            return Err(AuthError::InvalidToken);
        }
        let claims = self.jwt.validate_refresh_token(presented)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let mut conn = self.conn().await?;
        let user = User::find_by_id(&mut conn, user_id)
            .await
            .map_err(map_user_error)?;

        let stored = user
            .refresh_token
            .as_deref()
            .ok_or(AuthError::ExpiredToken)?;
        let stored_expiry = user
            .refresh_token_expires_at
            .ok_or(AuthError::ExpiredToken)?;

        // Constant-time comparison; a rotated-out token must not be
        // distinguishable from a wrong one by timing
        let matches = bool::from(stored.as_bytes().ct_eq(presented.as_bytes()));
        if !matches || stored_expiry < Utc::now() {
            return Err(AuthError::ExpiredToken);
        }

        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }

        let tenant = Tenant::find_by_id(&mut conn, user.tenant_id)
            .await
            .map_err(map_tenant_error)?;

        self.issue_token_pair(&mut conn, user, tenant).await
    }

    /// Load the authenticated user's own projections for `GET /auth/me`
    pub async fn current_user(
        &self,
        user_id: Uuid,
    ) -> Result<(UserResponse, TenantResponse), AuthError> {
        let mut conn = self.conn().await?;

        let user = User::find_by_id(&mut conn, user_id)
            .await
            .map_err(map_user_error)?;
        let tenant = Tenant::find_by_id(&mut conn, user.tenant_id)
            .await
            .map_err(map_tenant_error)?;

        Ok((UserResponse::from(&user), TenantResponse::from(&tenant)))
    }

    /// Create tenant + owner user + default features as one atomic unit.
    ///
    /// Concurrent first logins with the same email race onto the users.email
    /// uniqueness constraint; the loser rolls back completely and retries by
    /// reading the winner's row, so no orphaned tenant ever becomes visible.
    async fn onboard_tenant(
        &self,
        conn: &mut AsyncPgConnection,
        email: &str,
        name: &str,
        google_id: &str,
    ) -> Result<User, AuthError> {
        let defaults = &crate::app_config::config().tenant_defaults;
        let new_tenant = NewTenant::trial(email, name, defaults);
        let new_user = NewUser::owner(new_tenant.id, email, name, google_id);

        let result = conn
            .transaction::<_, diesel::result::Error, _>(|tx| {
                Box::pin(async move {
                    let tenant = Tenant::create(tx, new_tenant).await?;
                    let user = User::create(tx, new_user).await?;
                    let seeded = FeatureService::initialize_defaults(tx, tenant.id).await?;

                    info!(
                        tenant_id = %tenant.id,
                        features = seeded,
                        "New tenant onboarded"
                    );
                    Ok(user)
                })
            })
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )) => {
                // Another request created this account first; login is
                // idempotent on email, so reuse that row
                let existing = User::find_by_email(conn, email)
                    .await
                    .map_err(map_user_error)?;
                User::touch_last_login(conn, existing.id)
                    .await
                    .map_err(map_user_error)
            },
            Err(e) => Err(AuthError::DatabaseError(e.to_string())),
        }
    }

    /// Issue a fresh access+refresh pair and persist the refresh token
    /// (value + expiry) on the user row, overwriting any prior value
    async fn issue_token_pair(
        &self,
        conn: &mut AsyncPgConnection,
        user: User,
        tenant: Tenant,
    ) -> Result<AuthPayload, AuthError> {
        let access_token = self.jwt.generate_access_token(
            &user.id.to_string(),
            &user.email,
            &tenant.id.to_string(),
            &user.role,
        )?;
        let refresh_token = self.jwt.generate_refresh_token(&user.id.to_string())?;

        let expires_at =
            Utc::now() + Duration::seconds(self.jwt.refresh_token_expiry() as i64);
        let user = User::store_refresh_token(conn, user.id, &refresh_token, expires_at)
            .await
            .map_err(map_user_error)?;

        Ok(AuthPayload {
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_expiry(),
            token_type: "Bearer".to_string(),
            user: UserResponse::from(&user),
            tenant: TenantResponse::from(&tenant),
        })
    }
}

fn map_user_error(e: UserError) -> AuthError {
    match e {
        UserError::NotFound => AuthError::UserNotFound,
        UserError::Database(e) => AuthError::DatabaseError(e.to_string()),
    }
}

fn map_tenant_error(e: TenantError) -> AuthError {
    match e {
        TenantError::NotFound => AuthError::TenantNotFound,
        TenantError::Database(e) => AuthError::DatabaseError(e.to_string()),
    }
}
