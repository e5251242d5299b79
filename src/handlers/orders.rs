use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ecomm_service::EcommService;
use crate::domain::order::{NewOrder, NewOrderItem, Order, OrderItem};
use crate::errors::AppError;

use super::parse_decimal;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub name: String,
    pub quantity: i32,
    pub image: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub product_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub payment_method: String,
    pub tax_price: String,
    pub shipping_price: String,
    pub total_price: String,
    #[serde(default)]
    pub items: Vec<CreateOrderItemRequest>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, AppError> {
        let items = self
            .items
            .into_iter()
            .map(|i| {
                Ok(NewOrderItem {
                    price: parse_decimal("items.price", &i.price)?,
                    name: i.name,
                    quantity: i.quantity,
                    image: i.image,
                    product_id: i.product_id,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(NewOrder {
            tax_price: parse_decimal("tax_price", &self.tax_price)?,
            shipping_price: parse_decimal("shipping_price", &self.shipping_price)?,
            total_price: parse_decimal("total_price", &self.total_price)?,
            payment_method: self.payment_method,
            items,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub image: String,
    pub price: String,
    pub product_id: i64,
    pub order_id: i64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        OrderItemResponse {
            id: i.id,
            name: i.name,
            quantity: i.quantity,
            image: i.image,
            price: i.price.to_string(),
            product_id: i.product_id,
            order_id: i.order_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub payment_method: String,
    pub tax_price: String,
    pub shipping_price: String,
    pub total_price: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub items: Vec<OrderItemResponse>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id,
            payment_method: o.payment_method,
            tax_price: o.tax_price.to_string(),
            shipping_price: o.shipping_price.to_string(),
            total_price: o.total_price.to_string(),
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.map(|t| t.to_rfc3339()),
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates a new order together with its items. The order row and every item
/// row are written in a single database transaction: either all of them are
/// committed or none is.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Malformed decimal field"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<EcommService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order = body.into_inner().into_new_order()?;
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    let created = web::block(move || service.create_order(&ctx, order))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(created)))
}

/// GET /orders/{id}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<EcommService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    let order = web::block(move || service.get_order(&ctx, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// Returns every order with its items.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = Vec<OrderResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(service: web::Data<EcommService>) -> Result<HttpResponse, AppError> {
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    let orders = web::block(move || service.list_orders(&ctx))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /orders/{id}
///
/// Removes the order and all of its items in one transaction.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order id"),
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<EcommService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    web::block(move || service.delete_order(&ctx, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
