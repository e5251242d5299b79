use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;

use crate::domain::context::OpContext;
use crate::domain::errors::StorageError;
use crate::domain::order::{NewOrder, Order, OrderItem};
use crate::domain::ports::Storer;
use crate::domain::product::{NewProduct, Product};

#[derive(Debug, Clone, Default)]
struct Tables {
    products: BTreeMap<i64, Product>,
    // Orders are kept without their items; items live in their own table.
    orders: BTreeMap<i64, Order>,
    order_items: BTreeMap<i64, OrderItem>,
    last_product_id: i64,
    last_order_id: i64,
    last_item_id: i64,
}

impl Tables {
    fn items_of(&self, order_id: i64) -> Vec<OrderItem> {
        self.order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect()
    }

    fn with_items(&self, order: &Order) -> Order {
        Order {
            items: self.items_of(order.id),
            ..order.clone()
        }
    }
}

/// In-process storage gateway with the same contract as the database one.
///
/// Writes are applied to a copy of the tables that replaces the live copy
/// only when the whole unit of work succeeded. Foreign keys between order
/// items, orders and products are enforced.
#[derive(Debug, Default)]
pub struct MemoryStorer {
    tables: Mutex<Tables>,
}

impl MemoryStorer {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T, F>(&self, ctx: &OpContext, op: &str, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Tables) -> Result<T, StorageError>,
    {
        ctx.check(op)?;
        // Tables are only ever replaced whole, a poisoned guard is still consistent.
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        f(&*tables)
    }

    fn exec_tx<T, F>(&self, ctx: &OpContext, op: &str, work: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Tables) -> Result<T, StorageError>,
    {
        ctx.check(op)?;
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let mut staged = tables.clone();
        let value = work(&mut staged)?;
        ctx.check(op)?;
        *tables = staged;
        Ok(value)
    }
}

impl Storer for MemoryStorer {
    fn create_product(
        &self,
        ctx: &OpContext,
        product: NewProduct,
    ) -> Result<Product, StorageError> {
        let now = Utc::now();
        self.exec_tx(ctx, "create product", |t| {
            t.last_product_id += 1;
            let created = Product {
                id: t.last_product_id,
                name: product.name,
                image: product.image,
                category: product.category,
                description: product.description,
                rating: product.rating,
                num_reviews: product.num_reviews,
                price: product.price,
                count_in_stock: product.count_in_stock,
                created_at: now,
                updated_at: Some(now),
            };
            t.products.insert(created.id, created.clone());
            Ok(created)
        })
    }

    fn get_product(&self, ctx: &OpContext, id: i64) -> Result<Product, StorageError> {
        self.read(ctx, &format!("get product {}", id), |t| {
            t.products.get(&id).cloned().ok_or(StorageError::NotFound {
                entity: "product",
                id,
            })
        })
    }

    fn list_products(&self, ctx: &OpContext) -> Result<Vec<Product>, StorageError> {
        self.read(ctx, "list products", |t| {
            Ok(t.products.values().cloned().collect())
        })
    }

    fn update_product(
        &self,
        ctx: &OpContext,
        id: i64,
        product: NewProduct,
    ) -> Result<Product, StorageError> {
        let now = Utc::now();
        self.exec_tx(ctx, &format!("update product {}", id), |t| {
            let existing = t.products.get_mut(&id).ok_or(StorageError::NotFound {
                entity: "product",
                id,
            })?;
            *existing = Product {
                id,
                created_at: existing.created_at,
                updated_at: Some(now),
                name: product.name,
                image: product.image,
                category: product.category,
                description: product.description,
                rating: product.rating,
                num_reviews: product.num_reviews,
                price: product.price,
                count_in_stock: product.count_in_stock,
            };
            Ok(existing.clone())
        })
    }

    fn delete_product(&self, ctx: &OpContext, id: i64) -> Result<(), StorageError> {
        let op = format!("delete product {}", id);
        self.exec_tx(ctx, &op, |t| {
            if t.order_items.values().any(|i| i.product_id == id) {
                return Err(StorageError::query(
                    op.as_str(),
                    "product is still referenced by order items",
                ));
            }
            t.products
                .remove(&id)
                .map(|_| ())
                .ok_or(StorageError::NotFound {
                    entity: "product",
                    id,
                })
        })
    }

    fn create_order(&self, ctx: &OpContext, order: NewOrder) -> Result<Order, StorageError> {
        let op = "create order";
        let now = Utc::now();
        let order = self.exec_tx(ctx, op, |t| {
            t.last_order_id += 1;
            let mut created = Order {
                id: t.last_order_id,
                payment_method: order.payment_method,
                tax_price: order.tax_price,
                shipping_price: order.shipping_price,
                total_price: order.total_price,
                created_at: now,
                updated_at: Some(now),
                items: Vec::with_capacity(order.items.len()),
            };
            t.orders.insert(created.id, created.clone());

            for (idx, item) in order.items.into_iter().enumerate() {
                ctx.check(op)?;
                if !t.products.contains_key(&item.product_id) {
                    return Err(StorageError::query(
                        format!("insert item {} of order {}", idx, created.id),
                        format!("product {} does not exist", item.product_id),
                    ));
                }
                t.last_item_id += 1;
                let stored = OrderItem {
                    id: t.last_item_id,
                    name: item.name,
                    quantity: item.quantity,
                    image: item.image,
                    price: item.price,
                    product_id: item.product_id,
                    order_id: created.id,
                };
                t.order_items.insert(stored.id, stored.clone());
                created.items.push(stored);
            }
            Ok(created)
        })?;
        log::info!("created order {} with {} items", order.id, order.items.len());
        Ok(order)
    }

    fn get_order(&self, ctx: &OpContext, id: i64) -> Result<Order, StorageError> {
        self.read(ctx, &format!("get order {}", id), |t| {
            t.orders
                .get(&id)
                .map(|o| t.with_items(o))
                .ok_or(StorageError::NotFound { entity: "order", id })
        })
    }

    fn list_orders(&self, ctx: &OpContext) -> Result<Vec<Order>, StorageError> {
        self.read(ctx, "list orders", |t| {
            Ok(t.orders.values().map(|o| t.with_items(o)).collect())
        })
    }

    fn delete_order(&self, ctx: &OpContext, id: i64) -> Result<(), StorageError> {
        self.exec_tx(ctx, &format!("delete order {}", id), |t| {
            t.order_items.retain(|_, i| i.order_id != id);
            t.orders
                .remove(&id)
                .map(|_| ())
                .ok_or(StorageError::NotFound { entity: "order", id })
        })
    }
}
