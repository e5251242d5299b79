//! HTTP surface tests: every route is driven through `actix_web::test`
//! against the in-memory storer, so no database is needed.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use ecomm_service::{handlers, EcommService, MemoryStorer};
use serde_json::{json, Value};

fn service() -> web::Data<EcommService> {
    web::Data::new(EcommService::new(MemoryStorer::new()))
}

fn product_body(price: &str) -> Value {
    json!({
        "name": "Test Product",
        "image": "test_image.jpg",
        "category": "Test Category",
        "description": "Test Description",
        "rating": "5",
        "num_reviews": 10,
        "price": price,
        "count_in_stock": 100
    })
}

fn order_body(product_ids: &[i64]) -> Value {
    let items: Vec<Value> = product_ids
        .iter()
        .enumerate()
        .map(|(idx, id)| {
            json!({
                "name": format!("item {}", idx),
                "quantity": 1,
                "image": "item.jpg",
                "price": "49.99",
                "product_id": id
            })
        })
        .collect();
    json!({
        "payment_method": "paypal",
        "tax_price": "10.00",
        "shipping_price": "5.00",
        "total_price": "114.98",
        "items": items
    })
}

#[actix_web::test]
async fn product_crud_round_trip() {
    let app = test::init_service(App::new().app_data(service()).configure(handlers::configure)).await;

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(product_body("99.99"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Test Product");
    assert_eq!(created["price"], "99.99");
    assert_eq!(created["count_in_stock"], 100);
    assert_eq!(created["created_at"], created["updated_at"]);

    let req = test::TestRequest::get().uri("/products/1").to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::patch()
        .uri("/products/1")
        .set_json(product_body("79.50"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["price"], "79.50");
    assert_eq!(updated["created_at"], created["created_at"]);

    let req = test::TestRequest::get().uri("/products").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::delete().uri("/products/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/products/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "product with id 1 not found");
}

#[actix_web::test]
async fn malformed_decimal_is_bad_request() {
    let app = test::init_service(App::new().app_data(service()).configure(handlers::configure)).await;

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(product_body("ninety-nine"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_order_links_items_to_the_new_order() {
    let app = test::init_service(App::new().app_data(service()).configure(handlers::configure)).await;
    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(product_body("49.99"))
        .to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;
    let product_id = product["id"].as_i64().expect("product id");

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body(&[product_id, product_id]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;

    assert_eq!(order["payment_method"], "paypal");
    let items = order["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i["order_id"] == order["id"]));
    assert_ne!(items[0]["id"], items[1]["id"]);

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{}", order["id"]))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, order);

    let req = test::TestRequest::get().uri("/orders").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([order]));
}

#[actix_web::test]
async fn failed_order_is_not_persisted() {
    let app = test::init_service(App::new().app_data(service()).configure(handlers::configure)).await;
    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(product_body("49.99"))
        .to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;
    let product_id = product["id"].as_i64().expect("product id");

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body(&[product_id, 9_999]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Internal server error");

    let req = test::TestRequest::get().uri("/orders").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn delete_order_then_missing() {
    let app = test::init_service(App::new().app_data(service()).configure(handlers::configure)).await;
    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body(&[]))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/orders/{}", order["id"]);

    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unreadable_json_body_gets_error_body() {
    let app = test::init_service(App::new().app_data(service()).configure(handlers::configure)).await;

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"payment_method\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some_and(|m| m.starts_with("Bad request")));

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "missing everything else" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn non_numeric_id_gets_error_body() {
    let app = test::init_service(App::new().app_data(service()).configure(handlers::configure)).await;

    for uri in ["/products/abc", "/orders/1.5"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string(), "{}", uri);
    }
}

#[actix_web::test]
async fn expired_request_deadline_is_gateway_timeout() {
    let service = web::Data::new(
        EcommService::new(MemoryStorer::new()).with_request_timeout(Duration::ZERO),
    );
    let app = test::init_service(App::new().app_data(service).configure(handlers::configure)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;

    assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[actix_web::test]
async fn openapi_document_lists_routes() {
    let app = test::init_service(App::new().app_data(service()).configure(handlers::configure)).await;

    let req = test::TestRequest::get()
        .uri("/api-docs/openapi.json")
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;

    for path in ["/products", "/products/{id}", "/orders", "/orders/{id}"] {
        assert!(doc["paths"][path].is_object(), "missing path {}", path);
    }
}
