use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub name: String,
    pub quantity: i32,
    pub image: String,
    pub price: BigDecimal,
    pub product_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub payment_method: String,
    pub tax_price: BigDecimal,
    pub shipping_price: BigDecimal,
    pub total_price: BigDecimal,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub image: String,
    pub price: BigDecimal,
    pub product_id: i64,
    pub order_id: i64,
}

/// An order together with every item it owns, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub payment_method: String,
    pub tax_price: BigDecimal,
    pub shipping_price: BigDecimal,
    pub total_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
}
