// Restaurant table database model
// Read-only in this core; orders reference tables optionally

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::restaurant_tables;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = restaurant_tables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RestaurantTable {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RestaurantTable {
    /// Find a table by ID within a tenant
    pub async fn find_for_tenant(
        conn: &mut AsyncPgConnection,
        table_id: Uuid,
        tenant: Uuid,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::restaurant_tables::dsl::*;

        restaurant_tables
            .filter(id.eq(table_id))
            .filter(tenant_id.eq(tenant))
            .first::<RestaurantTable>(conn)
            .await
    }
}
