use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ecomm_service::EcommService;
use crate::domain::product::{NewProduct, Product};
use crate::errors::AppError;

use super::parse_decimal;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    /// Decimal as a string, e.g. "4.5"
    pub rating: String,
    pub num_reviews: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "99.99"
    pub price: String,
    pub count_in_stock: i32,
}

impl ProductRequest {
    fn into_new_product(self) -> Result<NewProduct, AppError> {
        Ok(NewProduct {
            rating: parse_decimal("rating", &self.rating)?,
            price: parse_decimal("price", &self.price)?,
            name: self.name,
            image: self.image,
            category: self.category,
            description: self.description,
            num_reviews: self.num_reviews,
            count_in_stock: self.count_in_stock,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: String,
    pub num_reviews: i32,
    pub price: String,
    pub count_in_stock: i32,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            image: p.image,
            category: p.category,
            description: p.description,
            rating: p.rating.to_string(),
            num_reviews: p.num_reviews,
            price: p.price.to_string(),
            count_in_stock: p.count_in_stock,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Malformed decimal field"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<EcommService>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = body.into_inner().into_new_product()?;
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    let created = web::block(move || service.create_product(&ctx, product))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(created)))
}

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = Vec<ProductResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(service: web::Data<EcommService>) -> Result<HttpResponse, AppError> {
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    let products = web::block(move || service.list_products(&ctx))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn get_product(
    service: web::Data<EcommService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    let product = web::block(move || service.get_product(&ctx, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// PATCH /products/{id}
///
/// Replaces every editable field of the product and refreshes `updated_at`.
#[utoipa::path(
    patch,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id"),
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Malformed decimal field"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn update_product(
    service: web::Data<EcommService>,
    path: web::Path<i64>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = body.into_inner().into_new_product()?;
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    let updated = web::block(move || service.update_product(&ctx, id, product))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(updated)))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    service: web::Data<EcommService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let ctx = service.request_context();
    let _cancel = ctx.cancel_on_drop();

    web::block(move || service.delete_product(&ctx, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
