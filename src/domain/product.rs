use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

/// Caller-supplied product fields, used for both create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: BigDecimal,
    pub num_reviews: i32,
    pub price: BigDecimal,
    pub count_in_stock: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
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

impl Product {
    /// The caller-editable part of the product.
    pub fn details(&self) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            image: self.image.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            rating: self.rating.clone(),
            num_reviews: self.num_reviews,
            price: self.price.clone(),
            count_in_stock: self.count_in_stock,
        }
    }
}
