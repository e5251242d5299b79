use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::order::{NewOrderItem, OrderItem};
use crate::domain::product::{NewProduct, Product};
use crate::schema::{order_items, orders, products};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: BigDecimal,
    pub num_reviews: i32,
    pub price: BigDecimal,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            image: r.image,
            category: r.category,
            description: r.description,
            rating: r.rating,
            num_reviews: r.num_reviews,
            price: r.price,
            count_in_stock: r.count_in_stock,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: BigDecimal,
    pub num_reviews: i32,
    pub price: BigDecimal,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewProductRow {
    pub fn stamped(p: NewProduct, now: DateTime<Utc>) -> Self {
        NewProductRow {
            name: p.name,
            image: p.image,
            category: p.category,
            description: p.description,
            rating: p.rating,
            num_reviews: p.num_reviews,
            price: p.price,
            count_in_stock: p.count_in_stock,
            created_at: now,
            updated_at: Some(now),
        }
    }
}

/// Every caller-editable column plus the refreshed `updated_at`.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset {
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: BigDecimal,
    pub num_reviews: i32,
    pub price: BigDecimal,
    pub count_in_stock: i32,
    pub updated_at: DateTime<Utc>,
}

impl ProductChangeset {
    pub fn stamped(p: NewProduct, now: DateTime<Utc>) -> Self {
        ProductChangeset {
            name: p.name,
            image: p.image,
            category: p.category,
            description: p.description,
            rating: p.rating,
            num_reviews: p.num_reviews,
            price: p.price,
            count_in_stock: p.count_in_stock,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub payment_method: String,
    pub tax_price: BigDecimal,
    pub shipping_price: BigDecimal,
    pub total_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub payment_method: String,
    pub tax_price: BigDecimal,
    pub shipping_price: BigDecimal,
    pub total_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub image: String,
    pub price: BigDecimal,
    pub product_id: i64,
    pub order_id: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        OrderItem {
            id: r.id,
            name: r.name,
            quantity: r.quantity,
            image: r.image,
            price: r.price,
            product_id: r.product_id,
            order_id: r.order_id,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub name: String,
    pub quantity: i32,
    pub image: String,
    pub price: BigDecimal,
    pub product_id: i64,
    pub order_id: i64,
}

impl NewOrderItemRow {
    pub fn for_order(item: NewOrderItem, order_id: i64) -> Self {
        NewOrderItemRow {
            name: item.name,
            quantity: item.quantity,
            image: item.image,
            price: item.price,
            product_id: item.product_id,
            order_id,
        }
    }
}
