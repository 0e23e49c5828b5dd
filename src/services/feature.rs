// Default-feature initialization for newly onboarded tenants
// Runs inside the onboarding transaction so a half-seeded tenant never exists

use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::models::tenant::NewTenantFeature;
use crate::schema::tenant_features;

/// Feature flags every new tenant starts with
pub const DEFAULT_FEATURES: &[&str] = &["orders", "menu", "tables", "billing", "reports"];

pub struct FeatureService;

impl FeatureService {
    /// Seed the default feature set for a tenant.
    /// Returns the number of features written.
    pub async fn initialize_defaults(
        conn: &mut AsyncPgConnection,
        tenant_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        let rows: Vec<NewTenantFeature> = DEFAULT_FEATURES
            .iter()
            .map(|key| NewTenantFeature {
                id: Uuid::new_v4(),
                tenant_id,
                feature_key: key.to_string(),
                enabled: true,
            })
            .collect();

        diesel::insert_into(tenant_features::table)
            .values(&rows)
            .execute(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feature_set() {
        assert!(!DEFAULT_FEATURES.is_empty());
        assert!(DEFAULT_FEATURES.contains(&"orders"));
        assert!(DEFAULT_FEATURES.contains(&"billing"));

        // keys are unique
        let mut keys: Vec<&str> = DEFAULT_FEATURES.to_vec();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), DEFAULT_FEATURES.len());
    }
}
