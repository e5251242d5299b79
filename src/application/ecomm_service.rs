use std::sync::Arc;
use std::time::Duration;

use crate::domain::context::OpContext;
use crate::domain::errors::StorageError;
use crate::domain::order::{NewOrder, Order};
use crate::domain::ports::Storer;
use crate::domain::product::{NewProduct, Product};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Request-facing entry point over a [`Storer`].
#[derive(Clone)]
pub struct EcommService {
    storer: Arc<dyn Storer>,
    request_timeout: Duration,
}

impl EcommService {
    pub fn new<S: Storer>(storer: S) -> Self {
        Self {
            storer: Arc::new(storer),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// A fresh context bounded by the request timeout.
    pub fn request_context(&self) -> OpContext {
        OpContext::with_timeout(self.request_timeout)
    }

    pub fn create_product(
        &self,
        ctx: &OpContext,
        product: NewProduct,
    ) -> Result<Product, StorageError> {
        self.storer.create_product(ctx, product)
    }

    pub fn get_product(&self, ctx: &OpContext, id: i64) -> Result<Product, StorageError> {
        self.storer.get_product(ctx, id)
    }

    pub fn list_products(&self, ctx: &OpContext) -> Result<Vec<Product>, StorageError> {
        self.storer.list_products(ctx)
    }

    pub fn update_product(
        &self,
        ctx: &OpContext,
        id: i64,
        product: NewProduct,
    ) -> Result<Product, StorageError> {
        self.storer.update_product(ctx, id, product)
    }

    pub fn delete_product(&self, ctx: &OpContext, id: i64) -> Result<(), StorageError> {
        self.storer.delete_product(ctx, id)
    }

    pub fn create_order(&self, ctx: &OpContext, order: NewOrder) -> Result<Order, StorageError> {
        self.storer.create_order(ctx, order)
    }

    pub fn get_order(&self, ctx: &OpContext, id: i64) -> Result<Order, StorageError> {
        self.storer.get_order(ctx, id)
    }

    pub fn list_orders(&self, ctx: &OpContext) -> Result<Vec<Order>, StorageError> {
        self.storer.list_orders(ctx)
    }

    pub fn delete_order(&self, ctx: &OpContext, id: i64) -> Result<(), StorageError> {
        self.storer.delete_order(ctx, id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::EcommService;
    use crate::domain::order::{NewOrder, NewOrderItem};
    use crate::domain::product::NewProduct;
    use crate::infrastructure::MemoryStorer;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn request_context_carries_deadline() {
        let service = EcommService::new(MemoryStorer::new())
            .with_request_timeout(std::time::Duration::from_secs(5));
        let ctx = service.request_context();
        let left = ctx.remaining().expect("deadline set");
        assert!(left <= std::time::Duration::from_secs(5));
    }

    #[test]
    fn oversized_request_timeout_does_not_overflow() {
        let service = EcommService::new(MemoryStorer::new())
            .with_request_timeout(std::time::Duration::from_secs(u64::MAX));
        let ctx = service.request_context();
        assert!(ctx.check("list products").is_ok());
        assert!(service.list_products(&ctx).expect("list failed").is_empty());
    }

    #[test]
    fn delegates_to_storer() {
        let service = EcommService::new(MemoryStorer::new());
        let ctx = service.request_context();

        let product = service
            .create_product(
                &ctx,
                NewProduct {
                    name: "Mug".to_string(),
                    image: "mug.png".to_string(),
                    category: "Kitchen".to_string(),
                    description: "Holds coffee".to_string(),
                    rating: dec("4"),
                    num_reviews: 2,
                    price: dec("12.50"),
                    count_in_stock: 7,
                },
            )
            .expect("create product failed");

        let order = service
            .create_order(
                &ctx,
                NewOrder {
                    payment_method: "card".to_string(),
                    tax_price: dec("1.25"),
                    shipping_price: dec("0"),
                    total_price: dec("13.75"),
                    items: vec![NewOrderItem {
                        name: "Mug".to_string(),
                        quantity: 1,
                        image: "mug.png".to_string(),
                        price: dec("12.50"),
                        product_id: product.id,
                    }],
                },
            )
            .expect("create order failed");

        assert_eq!(service.get_order(&ctx, order.id).expect("get failed"), order);
        assert_eq!(service.list_orders(&ctx).expect("list failed").len(), 1);
        service.delete_order(&ctx, order.id).expect("delete failed");
        service.delete_product(&ctx, product.id).expect("delete failed");
        assert!(service.list_products(&ctx).expect("list failed").is_empty());
    }
}
