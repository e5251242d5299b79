use super::context::OpContext;
use super::errors::StorageError;
use super::order::{NewOrder, Order};
use super::product::{NewProduct, Product};

/// Storage gateway for products and orders.
///
/// Calls block until the store answers. `create_order` and `delete_order`
/// are all-or-nothing: on error no order or item row has been written or
/// removed.
pub trait Storer: Send + Sync + 'static {
    fn create_product(&self, ctx: &OpContext, product: NewProduct)
        -> Result<Product, StorageError>;
    fn get_product(&self, ctx: &OpContext, id: i64) -> Result<Product, StorageError>;
    fn list_products(&self, ctx: &OpContext) -> Result<Vec<Product>, StorageError>;
    fn update_product(
        &self,
        ctx: &OpContext,
        id: i64,
        product: NewProduct,
    ) -> Result<Product, StorageError>;
    fn delete_product(&self, ctx: &OpContext, id: i64) -> Result<(), StorageError>;

    fn create_order(&self, ctx: &OpContext, order: NewOrder) -> Result<Order, StorageError>;
    fn get_order(&self, ctx: &OpContext, id: i64) -> Result<Order, StorageError>;
    fn list_orders(&self, ctx: &OpContext) -> Result<Vec<Order>, StorageError>;
    fn delete_order(&self, ctx: &OpContext, id: i64) -> Result<(), StorageError>;
}
