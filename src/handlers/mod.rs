pub mod orders;
pub mod products;

use std::str::FromStr;

use actix_web::web;
use bigdecimal::BigDecimal;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        products::create_product,
        products::list_products,
        products::get_product,
        products::update_product,
        products::delete_product,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::delete_order,
    ),
    components(schemas(
        products::ProductRequest,
        products::ProductResponse,
        orders::CreateOrderRequest,
        orders::CreateOrderItemRequest,
        orders::OrderResponse,
        orders::OrderItemResponse,
    )),
    tags(
        (name = "products", description = "Product catalogue"),
        (name = "orders", description = "Orders and their items"),
    )
)]
pub struct ApiDoc;

/// Register every route plus the OpenAPI document and Swagger UI.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/products")
            .route("", web::post().to(products::create_product))
            .route("", web::get().to(products::list_products))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}", web::patch().to(products::update_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    )
    .service(
        web::scope("/orders")
            .route("", web::post().to(orders::create_order))
            .route("", web::get().to(orders::list_orders))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}", web::delete().to(orders::delete_order)),
    )
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}

pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(value.trim())
        .map_err(|e| AppError::BadRequest(format!("invalid {} '{}': {}", field, value, e)))
}
