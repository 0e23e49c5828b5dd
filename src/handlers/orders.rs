// Order API endpoints
// All routes sit behind the auth middleware; the tenant scope comes from the
// request context, never from the payload

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::TenantContext,
    models::order::{CreateOrderRequest, OrderResponse, UpdateOrderStatusRequest},
    services::order::OrderService,
};

/// Create a new order
/// POST /api/v1/orders
#[utoipa::path(
    post,
    path = "/v1/orders",
    tag = "Orders",
    operation_id = "createOrder",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Bad request - validation failed"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Tenant, table, or menu item not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(request): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    let service = OrderService::new(&state);

    match service.create_order(&ctx, request).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List the tenant's orders, oldest first
/// GET /api/v1/orders
#[utoipa::path(
    get,
    path = "/v1/orders",
    tag = "Orders",
    operation_id = "listOrders",
    responses(
        (status = 200, description = "Orders for the tenant", body = [OrderResponse]),
        (status = 401, description = "Unauthorized - invalid or missing token")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn list_orders(State(state): State<AppState>, ctx: TenantContext) -> impl IntoResponse {
    let service = OrderService::new(&state);

    match service.list_orders(&ctx).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific order by ID
/// GET /api/v1/orders/:id
#[utoipa::path(
    get,
    path = "/v1/orders/{id}",
    tag = "Orders",
    operation_id = "getOrder",
    params(
        ("id" = Uuid, Path, description = "Order ID (UUID)")
    ),
    responses(
        (status = 200, description = "Order retrieved successfully", body = OrderResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Order not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = OrderService::new(&state);

    match service.get_order(&ctx, order_id).await {
        Ok(order) => Json(order).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Transition an order's status, bumping its version
/// PUT /api/v1/orders/:id/status
#[utoipa::path(
    put,
    path = "/v1/orders/{id}/status",
    tag = "Orders",
    operation_id = "updateOrderStatus",
    params(
        ("id" = Uuid, Path, description = "Order ID (UUID)")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = OrderResponse),
        (status = 400, description = "Bad request - unrecognized status"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Order not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> impl IntoResponse {
    let service = OrderService::new(&state);

    match service
        .update_order_status(&ctx, order_id, &request.status)
        .await
    {
        Ok(order) => Json(order).into_response(),
        Err(e) => e.into_response(),
    }
}
