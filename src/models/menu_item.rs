// Menu item database model
// Order items snapshot name and price from here at order time

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::menu_items;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuItem {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Find a menu item by ID within a tenant
    pub async fn find_for_tenant(
        conn: &mut AsyncPgConnection,
        item_id: Uuid,
        tenant: Uuid,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::menu_items::dsl::*;

        menu_items
            .filter(id.eq(item_id))
            .filter(tenant_id.eq(tenant))
            .first::<MenuItem>(conn)
            .await
    }
}
