use std::time::Duration;

use chrono::Utc;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::context::OpContext;
use crate::domain::errors::{StorageError, TxStage};
use crate::domain::order::{NewOrder, Order, OrderItem};
use crate::domain::ports::Storer;
use crate::domain::product::{NewProduct, Product};
use crate::schema::{order_items, orders, products};

use super::models::{
    NewOrderItemRow, NewOrderRow, NewProductRow, OrderItemRow, OrderRow, ProductChangeset,
    ProductRow,
};

// ── Transaction plumbing ──────────────────────────────────────────────────────

fn tx_error(op: &str, stage: TxStage, source: diesel::result::Error) -> StorageError {
    StorageError::Transaction {
        op: op.to_string(),
        stage,
        source: Box::new(source),
    }
}

/// Decide what a failed unit of work surfaces once the rollback has run.
fn settle_failed<T>(
    op: &str,
    err: StorageError,
    rollback: QueryResult<()>,
) -> Result<T, StorageError> {
    match rollback {
        Ok(()) => {
            log::debug!("rolled back {}: {}", op, err);
            Err(err)
        }
        Err(source) => {
            log::error!("rollback of {} failed ({}), original error: {}", op, source, err);
            Err(tx_error(op, TxStage::Rollback, source))
        }
    }
}

/// Postgres accepts `1..=i32::MAX` milliseconds; 0 would disable the timeout.
/// Rounded up so the server never aborts a statement before the deadline.
fn statement_timeout_millis(left: Duration) -> u128 {
    left.as_micros().div_ceil(1000).clamp(1, i32::MAX as u128)
}

/// A statement the server aborted because the deadline passed surfaces as
/// the cancellation, not as the query error it was reported with.
fn deadline_error(ctx: &OpContext, op: &str, err: StorageError) -> StorageError {
    if matches!(err, StorageError::Cancelled { .. }) {
        return err;
    }
    match ctx.check(op) {
        Ok(()) => err,
        Err(cancelled) => {
            log::warn!("{} stopped at its deadline: {}", op, err);
            cancelled
        }
    }
}

/// Bound every statement of the current transaction by the context deadline.
fn apply_deadline(conn: &mut PgConnection, ctx: &OpContext, op: &str) -> Result<(), StorageError> {
    let Some(left) = ctx.remaining() else {
        return Ok(());
    };
    diesel::sql_query(format!(
        "SET LOCAL statement_timeout = {}",
        statement_timeout_millis(left)
    ))
        .execute(conn)
        .map_err(|e| StorageError::query(format!("set statement timeout for {}", op), e))?;
    Ok(())
}

// ── Row helpers ───────────────────────────────────────────────────────────────

fn find_product(conn: &mut PgConnection, id: i64) -> Result<Product, StorageError> {
    products::table
        .find(id)
        .select(ProductRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| StorageError::query(format!("get product {}", id), e))?
        .map(Product::from)
        .ok_or(StorageError::NotFound {
            entity: "product",
            id,
        })
}

fn load_items(conn: &mut PgConnection, order_id: i64) -> Result<Vec<OrderItem>, StorageError> {
    let rows = order_items::table
        .filter(order_items::order_id.eq(order_id))
        .select(OrderItemRow::as_select())
        .order(order_items::id.asc())
        .load(conn)
        .map_err(|e| StorageError::query(format!("get items of order {}", order_id), e))?;
    Ok(rows.into_iter().map(OrderItem::from).collect())
}

fn assemble(order: OrderRow, items: Vec<OrderItem>) -> Order {
    Order {
        id: order.id,
        payment_method: order.payment_method,
        tax_price: order.tax_price,
        shipping_price: order.shipping_price,
        total_price: order.total_price,
        created_at: order.created_at,
        updated_at: order.updated_at,
        items,
    }
}

// ── Storer ────────────────────────────────────────────────────────────────────

/// PostgreSQL storage gateway backed by a diesel r2d2 pool.
pub struct DieselStorer {
    pool: DbPool,
}

impl DieselStorer {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run `work` inside a single database transaction.
    ///
    /// The transaction is committed only when `work` succeeds. Otherwise it
    /// is rolled back and the error from `work` is returned, unless the
    /// rollback itself fails, in which case that failure is returned. Once
    /// the context has expired the error is [`StorageError::Cancelled`].
    fn exec_tx<T, F>(&self, ctx: &OpContext, op: &str, work: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, StorageError>,
    {
        ctx.check(op)?;
        let mut pooled = self
            .pool
            .get()
            .map_err(|e| StorageError::Connection(Box::new(e)))?;
        let conn: &mut PgConnection = &mut pooled;

        AnsiTransactionManager::begin_transaction(conn)
            .map_err(|e| tx_error(op, TxStage::Begin, e))?;

        match apply_deadline(conn, ctx, op).and_then(|()| work(conn)) {
            Ok(value) => {
                AnsiTransactionManager::commit_transaction(conn)
                    .map_err(|e| tx_error(op, TxStage::Commit, e))?;
                Ok(value)
            }
            Err(err) => {
                let rollback = AnsiTransactionManager::rollback_transaction(conn);
                settle_failed(op, deadline_error(ctx, op, err), rollback)
            }
        }
    }
}

impl Storer for DieselStorer {
    fn create_product(
        &self,
        ctx: &OpContext,
        product: NewProduct,
    ) -> Result<Product, StorageError> {
        let now = Utc::now();
        let row = self.exec_tx(ctx, "create product", |conn| {
            diesel::insert_into(products::table)
                .values(&NewProductRow::stamped(product, now))
                .returning(ProductRow::as_returning())
                .get_result(conn)
                .map_err(|e| StorageError::query("insert product", e))
        })?;
        log::debug!("created product {}", row.id);
        Ok(row.into())
    }

    fn get_product(&self, ctx: &OpContext, id: i64) -> Result<Product, StorageError> {
        self.exec_tx(ctx, &format!("get product {}", id), |conn| {
            find_product(conn, id)
        })
    }

    fn list_products(&self, ctx: &OpContext) -> Result<Vec<Product>, StorageError> {
        self.exec_tx(ctx, "list products", |conn| {
            let rows = products::table
                .select(ProductRow::as_select())
                .order(products::id.asc())
                .load(conn)
                .map_err(|e| StorageError::query("list products", e))?;
            Ok(rows.into_iter().map(Product::from).collect())
        })
    }

    fn update_product(
        &self,
        ctx: &OpContext,
        id: i64,
        product: NewProduct,
    ) -> Result<Product, StorageError> {
        let op = format!("update product {}", id);
        let now = Utc::now();
        let row = self.exec_tx(ctx, &op, |conn| {
            diesel::update(products::table.find(id))
                .set(&ProductChangeset::stamped(product, now))
                .returning(ProductRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(|e| StorageError::query(op.as_str(), e))?
                .ok_or(StorageError::NotFound {
                    entity: "product",
                    id,
                })
        })?;
        log::debug!("updated product {}", id);
        Ok(row.into())
    }

    fn delete_product(&self, ctx: &OpContext, id: i64) -> Result<(), StorageError> {
        let op = format!("delete product {}", id);
        self.exec_tx(ctx, &op, |conn| {
            let removed = diesel::delete(products::table.find(id))
                .execute(conn)
                .map_err(|e| StorageError::query(op.as_str(), e))?;
            if removed == 0 {
                return Err(StorageError::NotFound {
                    entity: "product",
                    id,
                });
            }
            Ok(())
        })?;
        log::debug!("deleted product {}", id);
        Ok(())
    }

    fn create_order(&self, ctx: &OpContext, order: NewOrder) -> Result<Order, StorageError> {
        let op = "create order";
        let now = Utc::now();
        let NewOrder {
            payment_method,
            tax_price,
            shipping_price,
            total_price,
            items,
        } = order;

        let order = self.exec_tx(ctx, op, |conn| {
            // 1. Insert the order to learn its id
            let row = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    payment_method,
                    tax_price,
                    shipping_price,
                    total_price,
                    created_at: now,
                    updated_at: Some(now),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)
                .map_err(|e| StorageError::query("insert order", e))?;

            // 2. Insert the items one by one, in the caller's sequence
            let mut created = Vec::with_capacity(items.len());
            for (idx, item) in items.into_iter().enumerate() {
                ctx.check(op)?;
                let item_row = diesel::insert_into(order_items::table)
                    .values(&NewOrderItemRow::for_order(item, row.id))
                    .returning(OrderItemRow::as_returning())
                    .get_result(conn)
                    .map_err(|e| {
                        StorageError::query(format!("insert item {} of order {}", idx, row.id), e)
                    })?;
                created.push(OrderItem::from(item_row));
            }

            Ok(assemble(row, created))
        })?;

        log::info!("created order {} with {} items", order.id, order.items.len());
        Ok(order)
    }

    fn get_order(&self, ctx: &OpContext, id: i64) -> Result<Order, StorageError> {
        self.exec_tx(ctx, &format!("get order {}", id), |conn| {
            let row = orders::table
                .find(id)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()
                .map_err(|e| StorageError::query(format!("get order {}", id), e))?
                .ok_or(StorageError::NotFound { entity: "order", id })?;
            let items = load_items(conn, row.id)?;
            Ok(assemble(row, items))
        })
    }

    fn list_orders(&self, ctx: &OpContext) -> Result<Vec<Order>, StorageError> {
        let op = "list orders";
        self.exec_tx(ctx, op, |conn| {
            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::id.asc())
                .load(conn)
                .map_err(|e| StorageError::query(op, e))?;

            // One item query per order.
            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                ctx.check(op)?;
                let items = load_items(conn, row.id)?;
                out.push(assemble(row, items));
            }
            Ok(out)
        })
    }

    fn delete_order(&self, ctx: &OpContext, id: i64) -> Result<(), StorageError> {
        let op = format!("delete order {}", id);
        self.exec_tx(ctx, &op, |conn| {
            let removed_items =
                diesel::delete(order_items::table.filter(order_items::order_id.eq(id)))
                    .execute(conn)
                    .map_err(|e| StorageError::query(format!("delete items of order {}", id), e))?;

            ctx.check(&op)?;
            let removed = diesel::delete(orders::table.find(id))
                .execute(conn)
                .map_err(|e| StorageError::query(op.as_str(), e))?;
            if removed == 0 {
                return Err(StorageError::NotFound { entity: "order", id });
            }

            log::info!("deleted order {} and {} items", id, removed_items);
            Ok(())
        })
    }
}
