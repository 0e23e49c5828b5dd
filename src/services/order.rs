// Order business logic
// Every read and write here is scoped to the tenant carried in the
// request context; nothing falls back to a process-wide tenant.

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    db::DieselPool,
    middleware::TenantContext,
    models::{
        menu_item::MenuItem,
        order::{
            CreateOrderRequest, ItemStatus, NewOrder, NewOrderItem, Order, OrderResponse,
            OrderStatus, OrderTotals, OrderType,
        },
        table::RestaurantTable,
        tenant::{Tenant, TenantError},
    },
    utils::service_error::ServiceError,
};

pub struct OrderService {
    pool: DieselPool,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
        }
    }

    /// Create an order aggregate: header plus item snapshots, inserted
    /// atomically, with totals derived from the tenant's rates.
    #[instrument(skip(self, request))]
    pub async fn create_order(
        &self,
        ctx: &TenantContext,
        mut request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request.sanitize();
        request.validate()?;
        for item in &request.items {
            item.validate()?;
        }
        let order_type = request
            .order_type
            .parse::<OrderType>()
            .map_err(ServiceError::ValidationError)?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        // The tenant supplies the tax and service-charge rates
        let tenant = Tenant::find_by_id(&mut conn, ctx.tenant_id)
            .await
            .map_err(|e| match e {
                TenantError::NotFound => ServiceError::NotFound("Tenant"),
                TenantError::Database(e) => ServiceError::DatabaseError(e.to_string()),
            })?;

        let table_id = match request.table_id {
            Some(requested) => Some(
                RestaurantTable::find_for_tenant(&mut conn, requested, ctx.tenant_id)
                    .await
                    .map_err(|e| ServiceError::from_lookup("Table", e))?
                    .id,
            ),
            None => None,
        };

        let order_id = Uuid::new_v4();
        let mut new_items = Vec::with_capacity(request.items.len());
        let mut subtotal_cents: i64 = 0;

        for item_req in &request.items {
            let menu_item =
                MenuItem::find_for_tenant(&mut conn, item_req.menu_item_id, ctx.tenant_id)
                    .await
                    .map_err(|e| ServiceError::from_lookup("Menu item", e))?;

            subtotal_cents += menu_item.price_cents * i64::from(item_req.quantity);

            // Name and price are copied here; later menu edits must not
            // change what this order charged
            new_items.push(NewOrderItem {
                id: Uuid::new_v4(),
                order_id,
                menu_item_id: menu_item.id,
                item_name: menu_item.name,
                unit_price_cents: menu_item.price_cents,
                quantity: item_req.quantity,
                special_instructions: item_req.special_instructions.clone(),
                status: ItemStatus::Pending.as_str().to_string(),
            });
        }

        let totals = OrderTotals::calculate(
            subtotal_cents,
            tenant.tax_rate_bps,
            tenant.service_charge_bps,
        );

        let new_order = NewOrder {
            id: order_id,
            tenant_id: ctx.tenant_id,
            table_id,
            customer_name: request.customer_name.clone(),
            customer_phone: request.customer_phone.clone(),
            order_type: order_type.as_str().to_string(),
            order_status: OrderStatus::Pending.as_str().to_string(),
            notes: request.notes.clone(),
            device_id: request.device_id.clone(),
            is_deleted: false,
            version: 1,
            synced_at: None,
            subtotal_cents: totals.subtotal_cents,
            tax_cents: totals.tax_cents,
            service_charge_cents: totals.service_charge_cents,
            total_cents: totals.total_cents,
        };

        let (order, items) = Order::insert_with_items(&mut conn, new_order, new_items).await?;

        info!(
            order_id = %order.id,
            tenant_id = %ctx.tenant_id,
            total_cents = order.total_cents,
            "Order created"
        );

        Ok(OrderResponse::from_parts(&order, &items))
    }

    /// All non-deleted orders for the tenant, oldest first
    pub async fn list_orders(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<OrderResponse>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let orders = Order::list_for_tenant(&mut conn, ctx.tenant_id).await?;
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let grouped = Order::items_for_orders(&mut conn, &ids).await?;

        Ok(orders
            .iter()
            .map(|order| {
                let items = grouped.get(&order.id).map(Vec::as_slice).unwrap_or(&[]);
                OrderResponse::from_parts(order, items)
            })
            .collect())
    }

    /// Fetch one order, scoped to the tenant
    pub async fn get_order(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
    ) -> Result<OrderResponse, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let order = Order::find_for_tenant(&mut conn, order_id, ctx.tenant_id)
            .await
            .map_err(|e| ServiceError::from_lookup("Order", e))?;
        let items = Order::items(&mut conn, order.id).await?;

        Ok(OrderResponse::from_parts(&order, &items))
    }

    /// Transition an order's status. The version bump and synced-at reset
    /// ride in the same conditional UPDATE as the status itself.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
        new_status: &str,
    ) -> Result<OrderResponse, ServiceError> {
        let status = new_status
            .parse::<OrderStatus>()
            .map_err(ServiceError::ValidationError)?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let order = Order::update_status(&mut conn, order_id, ctx.tenant_id, &status)
            .await
            .map_err(|e| ServiceError::from_lookup("Order", e))?;
        let items = Order::items(&mut conn, order.id).await?;

        info!(
            order_id = %order.id,
            status = status.as_str(),
            version = order.version,
            "Order status updated"
        );

        Ok(OrderResponse::from_parts(&order, &items))
    }
}
