// Order aggregate: order header plus owned item snapshots
// Totals are derived once at creation from the tenant's rates

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::{order_items, orders};

// =============================================================================
// ENUMS
// =============================================================================

/// How the order reaches the customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::Takeaway => "takeaway",
            OrderType::Delivery => "delivery",
        }
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dine_in" => Ok(OrderType::DineIn),
            "takeaway" => Ok(OrderType::Takeaway),
            "delivery" => Ok(OrderType::Delivery),
            _ => Err(format!("Invalid order type: {}", s)),
        }
    }
}

/// Order lifecycle status; completed and cancelled are terminal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Served,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "served" => Ok(OrderStatus::Served),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

/// Per-item kitchen status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Preparing => "preparing",
            ItemStatus::Ready => "ready",
            ItemStatus::Served => "served",
            ItemStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ItemStatus::Pending),
            "preparing" => Ok(ItemStatus::Preparing),
            "ready" => Ok(ItemStatus::Ready),
            "served" => Ok(ItemStatus::Served),
            "cancelled" => Ok(ItemStatus::Cancelled),
            _ => Err(format!("Invalid item status: {}", s)),
        }
    }
}

// =============================================================================
// TOTALS
// =============================================================================

/// Derived money amounts, all in integer minor units (cents/paise).
/// Rounding policy: round-half-up at the minor unit, applied per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub service_charge_cents: i64,
    pub total_cents: i64,
}

impl OrderTotals {
    pub fn calculate(subtotal_cents: i64, tax_rate_bps: i32, service_charge_bps: i32) -> Self {
        let tax_cents = apply_rate_bps(subtotal_cents, tax_rate_bps);
        let service_charge_cents = apply_rate_bps(subtotal_cents, service_charge_bps);

        Self {
            subtotal_cents,
            tax_cents,
            service_charge_cents,
            total_cents: subtotal_cents + tax_cents + service_charge_cents,
        }
    }
}

/// Apply a basis-point rate to an amount, rounding half up at the minor unit.
/// Amounts are non-negative here; half-up is implemented by biasing before
/// the integer division.
fn apply_rate_bps(amount_cents: i64, rate_bps: i32) -> i64 {
    (amount_cents * rate_bps as i64 + 5_000) / 10_000
}

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Order header row
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub order_type: String,
    pub order_status: String,
    pub notes: Option<String>,
    pub device_id: Option<String>,
    pub is_deleted: bool,
    pub version: i64,
    pub synced_at: Option<DateTime<Utc>>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub service_charge_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New order for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub order_type: String,
    pub order_status: String,
    pub notes: Option<String>,
    pub device_id: Option<String>,
    pub is_deleted: bool,
    pub version: i64,
    pub synced_at: Option<DateTime<Utc>>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub service_charge_cents: i64,
    pub total_cents: i64,
}

/// Order item row: the menu item's name and price are copied at creation and
/// never recomputed, even if the menu item changes later
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub special_instructions: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub special_instructions: Option<String>,
    pub status: String,
}

impl Order {
    /// Insert an order together with its items as one atomic unit
    pub async fn insert_with_items(
        conn: &mut AsyncPgConnection,
        new_order: NewOrder,
        new_items: Vec<NewOrderItem>,
    ) -> Result<(Self, Vec<OrderItem>), diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|tx| {
            Box::pin(async move {
                let order = diesel::insert_into(orders::table)
                    .values(&new_order)
                    .get_result::<Order>(tx)
                    .await?;

                let items = diesel::insert_into(order_items::table)
                    .values(&new_items)
                    .get_results::<OrderItem>(tx)
                    .await?;

                Ok((order, items))
            })
        })
        .await
    }

    /// Find a non-deleted order by ID within a tenant
    pub async fn find_for_tenant(
        conn: &mut AsyncPgConnection,
        order_id: Uuid,
        tenant: Uuid,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::orders::dsl::*;

        orders
            .filter(id.eq(order_id))
            .filter(tenant_id.eq(tenant))
            .filter(is_deleted.eq(false))
            .first::<Order>(conn)
            .await
    }

    /// All non-deleted orders for a tenant, oldest first
    pub async fn list_for_tenant(
        conn: &mut AsyncPgConnection,
        tenant: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::orders::dsl::*;

        orders
            .filter(tenant_id.eq(tenant))
            .filter(is_deleted.eq(false))
            .order((created_at.asc(), id.asc()))
            .load::<Order>(conn)
            .await
    }

    /// Items for one order, in insertion order
    pub async fn items(
        conn: &mut AsyncPgConnection,
        order: Uuid,
    ) -> Result<Vec<OrderItem>, diesel::result::Error> {
        use crate::schema::order_items::dsl::*;

        order_items
            .filter(order_id.eq(order))
            .order((created_at.asc(), id.asc()))
            .load::<OrderItem>(conn)
            .await
    }

    /// Items for a batch of orders, grouped by order ID
    pub async fn items_for_orders(
        conn: &mut AsyncPgConnection,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<OrderItem>>, diesel::result::Error> {
        use crate::schema::order_items::dsl::*;

        let rows = order_items
            .filter(order_id.eq_any(ids.to_vec()))
            .order((created_at.asc(), id.asc()))
            .load::<OrderItem>(conn)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row);
        }
        Ok(grouped)
    }

    /// Transition the status in a single conditional UPDATE.
    /// The version bump and synced-at reset happen in SQL so concurrent bumps
    /// cannot be lost to a read-modify-write race.
    pub async fn update_status(
        conn: &mut AsyncPgConnection,
        order_id: Uuid,
        tenant: Uuid,
        new_status: &OrderStatus,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::orders::dsl::*;

        diesel::update(
            orders
                .filter(id.eq(order_id))
                .filter(tenant_id.eq(tenant))
                .filter(is_deleted.eq(false)),
        )
        .set((
            order_status.eq(new_status.as_str()),
            version.eq(version + 1),
            synced_at.eq(None::<DateTime<Utc>>),
            updated_at.eq(Utc::now()),
        ))
        .get_result::<Order>(conn)
        .await
    }

    /// Get order status as enum, defaulting to Pending on bad data
    pub fn status_enum(&self) -> OrderStatus {
        OrderStatus::from_str(&self.order_status).unwrap_or_else(|e| {
            tracing::warn!(
                "Invalid order status '{}' for order {}: {}",
                self.order_status,
                self.id,
                e
            );
            OrderStatus::Pending
        })
    }
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

lazy_static! {
    static ref CUSTOMER_PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 \-()]{4,18}$").unwrap();
}

/// Request to create a new order
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "table_id": "123e4567-e89b-12d3-a456-426614174000",
    "customer_name": "Walk-in",
    "customer_phone": "+91 98765 43210",
    "order_type": "dine_in",
    "notes": "No onions",
    "device_id": "pos-terminal-1",
    "items": [
        {"menu_item_id": "223e4567-e89b-12d3-a456-426614174000", "quantity": 2},
        {"menu_item_id": "323e4567-e89b-12d3-a456-426614174000", "quantity": 1, "special_instructions": "extra spicy"}
    ]
}))]
pub struct CreateOrderRequest {
    pub table_id: Option<Uuid>,

    #[validate(length(max = 255, message = "Customer name must be less than 255 characters"))]
    pub customer_name: Option<String>,

    #[validate(regex(
        path = "CUSTOMER_PHONE_REGEX",
        message = "Customer phone must be a valid phone number"
    ))]
    pub customer_phone: Option<String>,

    pub order_type: String,

    #[validate(length(max = 2000, message = "Notes must be less than 2000 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 128, message = "Device ID must be less than 128 characters"))]
    pub device_id: Option<String>,

    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    /// Trim free-text fields, dropping ones that are blank after trimming
    pub fn sanitize(&mut self) {
        self.customer_name = crate::utils::trim_optional_field(self.customer_name.as_ref());
        self.customer_phone = crate::utils::trim_optional_field(self.customer_phone.as_ref());
        self.notes = crate::utils::trim_optional_field(self.notes.as_ref());
        self.device_id = crate::utils::trim_optional_field(self.device_id.as_ref());
        for item in &mut self.items {
            item.special_instructions =
                crate::utils::trim_optional_field(item.special_instructions.as_ref());
        }
    }
}

/// One requested line in a new order
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    pub menu_item_id: Uuid,

    #[validate(range(min = 1, max = 999, message = "Quantity must be between 1 and 999"))]
    pub quantity: i32,

    #[validate(length(max = 500, message = "Special instructions must be less than 500 characters"))]
    pub special_instructions: Option<String>,
}

/// Request to transition an order's status
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({"status": "confirmed"}))]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Full order projection returned to API clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub tenant_id: String,
    pub table_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub order_type: String,
    pub order_status: String,
    pub notes: Option<String>,
    pub device_id: Option<String>,
    pub version: i64,
    pub synced_at: Option<DateTime<Utc>>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub service_charge_cents: i64,
    pub total_cents: i64,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: String,
    pub menu_item_id: String,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub special_instructions: Option<String>,
    pub status: String,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id.to_string(),
            menu_item_id: item.menu_item_id.to_string(),
            item_name: item.item_name.clone(),
            unit_price_cents: item.unit_price_cents,
            quantity: item.quantity,
            special_instructions: item.special_instructions.clone(),
            status: item.status.clone(),
        }
    }
}

impl OrderResponse {
    pub fn from_parts(order: &Order, items: &[OrderItem]) -> Self {
        Self {
            id: order.id.to_string(),
            tenant_id: order.tenant_id.to_string(),
            table_id: order.table_id.map(|t| t.to_string()),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            order_type: order.order_type.clone(),
            order_status: order.order_status.clone(),
            notes: order.notes.clone(),
            device_id: order.device_id.clone(),
            version: order.version,
            synced_at: order.synced_at,
            subtotal_cents: order.subtotal_cents,
            tax_cents: order.tax_cents,
            service_charge_cents: order.service_charge_cents,
            total_cents: order.total_cents,
            items: items.iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_conversion() {
        assert_eq!(OrderType::DineIn.as_str(), "dine_in");
        assert_eq!(OrderType::from_str("dine_in"), Ok(OrderType::DineIn));
        assert_eq!(OrderType::from_str("takeaway"), Ok(OrderType::Takeaway));
        assert_eq!(OrderType::from_str("delivery"), Ok(OrderType::Delivery));
        assert!(OrderType::from_str("DINE_IN").is_err());
        assert!(OrderType::from_str("drive_through").is_err());
    }

    #[test]
    fn test_order_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Served,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), Ok(status.clone()));
        }
        assert!(OrderStatus::from_str("unknown").is_err());
        assert!(OrderStatus::from_str("").is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Served.is_terminal());
    }

    #[test]
    fn test_item_status_conversion() {
        assert_eq!(ItemStatus::Pending.as_str(), "pending");
        assert_eq!(ItemStatus::from_str("served"), Ok(ItemStatus::Served));
        assert!(ItemStatus::from_str("burnt").is_err());
    }

    #[test]
    fn test_totals_reference_case() {
        // items [(10.00, qty 2), (5.00, qty 1)] at 5% tax, 10% service charge
        let subtotal = 1000 * 2 + 500;
        let totals = OrderTotals::calculate(subtotal, 500, 1000);

        assert_eq!(totals.subtotal_cents, 2500);
        assert_eq!(totals.tax_cents, 125);
        assert_eq!(totals.service_charge_cents, 250);
        assert_eq!(totals.total_cents, 2875);
    }

    #[test]
    fn test_totals_round_half_up() {
        // 1015 * 5% = 50.75 -> 51; 1015 * 10% = 101.5 -> 102
        let totals = OrderTotals::calculate(1015, 500, 1000);
        assert_eq!(totals.tax_cents, 51);
        assert_eq!(totals.service_charge_cents, 102);
        assert_eq!(totals.total_cents, 1015 + 51 + 102);

        // exactly representable: no rounding drift
        let totals = OrderTotals::calculate(10_000, 500, 1000);
        assert_eq!(totals.tax_cents, 500);
        assert_eq!(totals.service_charge_cents, 1_000);
    }

    #[test]
    fn test_totals_zero_rates() {
        let totals = OrderTotals::calculate(2500, 0, 0);
        assert_eq!(totals.tax_cents, 0);
        assert_eq!(totals.service_charge_cents, 0);
        assert_eq!(totals.total_cents, 2500);
    }

    #[test]
    fn test_totals_empty_subtotal() {
        let totals = OrderTotals::calculate(0, 500, 1000);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_create_order_request_validation() {
        let valid = CreateOrderRequest {
            table_id: None,
            customer_name: Some("Walk-in".to_string()),
            customer_phone: Some("+91 98765 43210".to_string()),
            order_type: "dine_in".to_string(),
            notes: None,
            device_id: Some("pos-1".to_string()),
            items: vec![OrderItemRequest {
                menu_item_id: Uuid::new_v4(),
                quantity: 2,
                special_instructions: None,
            }],
        };
        assert!(valid.validate().is_ok());

        let mut empty_items = valid.clone();
        empty_items.items.clear();
        assert!(empty_items.validate().is_err());

        let mut bad_phone = valid.clone();
        bad_phone.customer_phone = Some("not-a-phone".to_string());
        assert!(bad_phone.validate().is_err());
    }

    #[test]
    fn test_order_item_request_quantity_bounds() {
        let item = OrderItemRequest {
            menu_item_id: Uuid::new_v4(),
            quantity: 0,
            special_instructions: None,
        };
        assert!(item.validate().is_err());

        let item = OrderItemRequest {
            menu_item_id: Uuid::new_v4(),
            quantity: 1,
            special_instructions: None,
        };
        assert!(item.validate().is_ok());
    }
}
