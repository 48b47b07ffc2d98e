//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use northloom_core::{OrderId, OrderItemId, Price, ProductId};

/// A placed order. Orders are keyed to a customer by telephone number; there
/// is no customer account table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub full_name: String,
    pub telephone: String,
    pub paid: bool,
    pub delivered: bool,
    pub returned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
}

/// One line of an order.
///
/// `price` is the unit price at the time the order was placed; later catalog
/// price changes do not rewrite history.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub size: String,
    pub quantity: i32,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
