// Tenant database model
// One tenant per onboarded restaurant; the unit of data isolation

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::app_config::TenantDefaultsConfig;
use crate::schema::{tenant_features, tenants};

/// Subscription plan enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubscriptionPlan {
    Trial,
    Starter,
    Pro,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Trial => "trial",
            SubscriptionPlan::Starter => "starter",
            SubscriptionPlan::Pro => "pro",
        }
    }
}

impl FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(SubscriptionPlan::Trial),
            "starter" => Ok(SubscriptionPlan::Starter),
            "pro" => Ok(SubscriptionPlan::Pro),
            _ => Err(format!("Invalid subscription plan: {}", s)),
        }
    }
}

/// Subscription status enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(SubscriptionStatus::Trial),
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

/// Tenant database model - queryable from database
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = tenants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tenant {
    pub id: Uuid,
    pub owner_email: String,
    pub owner_name: String,
    pub restaurant_name: String,
    pub subscription_plan: String,
    pub subscription_status: String,
    pub trial_ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub max_users: i32,
    pub max_storage_mb: i32,
    pub currency: String,
    pub timezone: String,
    pub tax_rate_bps: i32,
    pub service_charge_bps: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New tenant for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tenants)]
pub struct NewTenant {
    pub id: Uuid,
    pub owner_email: String,
    pub owner_name: String,
    pub restaurant_name: String,
    pub subscription_plan: String,
    pub subscription_status: String,
    pub trial_ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub max_users: i32,
    pub max_storage_mb: i32,
    pub currency: String,
    pub timezone: String,
    pub tax_rate_bps: i32,
    pub service_charge_bps: i32,
}

impl NewTenant {
    /// Build a tenant with trial defaults for a first-time owner login
    pub fn trial(owner_email: &str, owner_name: &str, defaults: &TenantDefaultsConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_email: owner_email.to_string(),
            owner_name: owner_name.to_string(),
            restaurant_name: format!("{}'s Restaurant", owner_name),
            subscription_plan: SubscriptionPlan::Trial.as_str().to_string(),
            subscription_status: SubscriptionStatus::Trial.as_str().to_string(),
            trial_ends_at: Utc::now() + Duration::days(defaults.trial_period_days),
            is_active: true,
            max_users: defaults.max_users,
            max_storage_mb: defaults.max_storage_mb,
            currency: defaults.currency.clone(),
            timezone: defaults.timezone.clone(),
            tax_rate_bps: defaults.tax_rate_bps,
            service_charge_bps: defaults.service_charge_bps,
        }
    }
}

/// Feature flag row seeded once per new tenant
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = tenant_features)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TenantFeature {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub feature_key: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tenant_features)]
pub struct NewTenantFeature {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub feature_key: String,
    pub enabled: bool,
}

/// Errors for tenant operations
#[derive(thiserror::Error, Debug)]
pub enum TenantError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Tenant not found")]
    NotFound,
}

impl Tenant {
    /// Find tenant by ID
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        tenant_id: Uuid,
    ) -> Result<Self, TenantError> {
        use crate::schema::tenants::dsl::*;

        tenants
            .filter(id.eq(tenant_id))
            .first::<Tenant>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => TenantError::NotFound,
                _ => TenantError::Database(e),
            })
    }

    /// Create a new tenant. Returns the raw diesel error so callers composing
    /// transactions can inspect constraint violations.
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_tenant: NewTenant,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::tenants::dsl::*;

        diesel::insert_into(tenants)
            .values(&new_tenant)
            .get_result::<Tenant>(conn)
            .await
    }

    /// Get subscription plan as enum, defaulting to Trial on bad data
    pub fn subscription_plan_enum(&self) -> SubscriptionPlan {
        SubscriptionPlan::from_str(&self.subscription_plan).unwrap_or_else(|e| {
            tracing::warn!(
                "Invalid subscription plan '{}' for tenant {}: {}",
                self.subscription_plan,
                self.id,
                e
            );
            SubscriptionPlan::Trial
        })
    }
}

/// Tenant projection returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantResponse {
    pub id: String,
    pub restaurant_name: String,
    pub subscription_plan: String,
    pub subscription_status: String,
    pub trial_ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub currency: String,
    pub timezone: String,
    pub tax_rate_bps: i32,
    pub service_charge_bps: i32,
}

impl From<&Tenant> for TenantResponse {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id.to_string(),
            restaurant_name: tenant.restaurant_name.clone(),
            subscription_plan: tenant.subscription_plan.clone(),
            subscription_status: tenant.subscription_status.clone(),
            trial_ends_at: tenant.trial_ends_at,
            is_active: tenant.is_active,
            currency: tenant.currency.clone(),
            timezone: tenant.timezone.clone(),
            tax_rate_bps: tenant.tax_rate_bps,
            service_charge_bps: tenant.service_charge_bps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_defaults() -> TenantDefaultsConfig {
        TenantDefaultsConfig {
            trial_period_days: 7,
            max_users: 5,
            max_storage_mb: 1024,
            currency: "INR".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            tax_rate_bps: 500,
            service_charge_bps: 1000,
        }
    }

    #[test]
    fn test_subscription_plan_conversion() {
        assert_eq!(SubscriptionPlan::Trial.as_str(), "trial");
        assert_eq!(SubscriptionPlan::Pro.as_str(), "pro");

        assert_eq!(
            SubscriptionPlan::from_str("trial"),
            Ok(SubscriptionPlan::Trial)
        );
        assert_eq!(
            SubscriptionPlan::from_str("starter"),
            Ok(SubscriptionPlan::Starter)
        );
        assert!(SubscriptionPlan::from_str("invalid").is_err());
    }

    #[test]
    fn test_subscription_status_conversion() {
        assert_eq!(SubscriptionStatus::PastDue.as_str(), "past_due");
        assert_eq!(
            SubscriptionStatus::from_str("past_due"),
            Ok(SubscriptionStatus::PastDue)
        );
        assert_eq!(
            SubscriptionStatus::from_str("cancelled"),
            Ok(SubscriptionStatus::Cancelled)
        );
        assert!(SubscriptionStatus::from_str("invalid").is_err());
    }

    #[test]
    fn test_trial_tenant_defaults() {
        let tenant = NewTenant::trial("owner@example.com", "Priya", &test_defaults());

        assert_eq!(tenant.owner_email, "owner@example.com");
        assert_eq!(tenant.restaurant_name, "Priya's Restaurant");
        assert_eq!(tenant.subscription_plan, "trial");
        assert_eq!(tenant.subscription_status, "trial");
        assert!(tenant.is_active);
        assert_eq!(tenant.max_users, 5);
        assert_eq!(tenant.max_storage_mb, 1024);
        assert_eq!(tenant.currency, "INR");
        assert_eq!(tenant.timezone, "Asia/Kolkata");
        assert_eq!(tenant.tax_rate_bps, 500);
        assert_eq!(tenant.service_charge_bps, 1000);

        let window = tenant.trial_ends_at - Utc::now();
        assert!(window > Duration::days(6) && window <= Duration::days(7));
    }
}
