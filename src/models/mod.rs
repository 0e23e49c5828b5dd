pub mod auth;
pub mod menu_item;
pub mod order;
pub mod table;
pub mod tenant;
pub mod user;

// Re-export common types
pub use auth::*;
pub use menu_item::MenuItem;
pub use order::{
    CreateOrderRequest, ItemStatus, NewOrder, NewOrderItem, Order, OrderItem, OrderItemRequest,
    OrderItemResponse, OrderResponse, OrderStatus, OrderTotals, OrderType,
    UpdateOrderStatusRequest,
};
pub use table::RestaurantTable;
pub use tenant::{
    NewTenant, NewTenantFeature, SubscriptionPlan, SubscriptionStatus, Tenant, TenantError,
    TenantFeature, TenantResponse,
};
pub use user::{AuthProvider, NewUser, User, UserError, UserResponse, UserRole};
