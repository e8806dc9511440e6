use std::net::SocketAddr;

use actix_web::{
    App,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::{StatusCode, header},
    test, web,
};
use serde_json::{Value, json};

use order_infra::auth::JwtConfig;
use order_infra::rate_limit::RateLimitConfig;

use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

fn state_with_limit(requests_per_minute: u32) -> AppState {
    AppState::in_memory(RateLimitConfig { requests_per_minute }, JwtConfig::default())
}

fn app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RateLimitMiddleware::new(state.rate_limiter.clone()))
        .app_data(web::Data::new(state))
        .app_data(super::json_config())
        .configure(super::configure_routes)
}

fn peer(addr: &str) -> SocketAddr {
    addr.parse().unwrap()
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

fn register_request(email: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Test Customer",
            "email": email,
            "password": "correct-horse",
            "phone": "555-0100"
        }))
}

/// `(customer_id, access_token)` from a register or login reply.
fn credentials(body: &Value) -> (String, String) {
    (
        body["customer"]["id"].as_str().unwrap().to_string(),
        body["access_token"].as_str().unwrap().to_string(),
    )
}

fn product_request(name: &str, price: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/products")
        .set_json(json!({"name": name, "price": price, "stock": 10}))
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(app(state_with_limit(100))).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in-memory");
}

#[actix_web::test]
async fn test_fifth_request_in_window_is_rejected() {
    let app = test::init_service(app(state_with_limit(3))).await;
    let client = peer("10.0.0.1:40000");

    // The counter is compared before it is incremented, so limit + 1 pass.
    for _ in 0..4 {
        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr(client)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/health")
        .peer_addr(client)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_header: u64 = resp
        .headers()
        .get(header::RETRY_AFTER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_header > 0 && retry_header <= 60);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Too many requests");
    assert_eq!(body["retry_after"], retry_header);
}

#[actix_web::test]
async fn test_clients_are_limited_separately() {
    let app = test::init_service(app(state_with_limit(0))).await;

    for addr in ["10.0.0.1:1000", "10.0.0.2:1000"] {
        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr(peer(addr))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    // Same IP, different port: still the same client.
    let req = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("10.0.0.1:2000"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[actix_web::test]
async fn test_cart_requires_token() {
    let app = test::init_service(app(state_with_limit(100))).await;

    let req = test::TestRequest::get()
        .uri("/api/customers/abc/cart")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_cart_lifecycle() {
    let app = test::init_service(app(state_with_limit(1000))).await;
    let body: Value =
        test::call_and_read_body_json(&app, register_request("cart@example.com").to_request())
            .await;
    let (customer_id, token) = credentials(&body);
    let product: Value =
        test::call_and_read_body_json(&app, product_request("Green Tea", "4.50").to_request())
            .await;
    let product_id = product["id"].as_str().unwrap();
    let item_uri = format!("/api/customers/{}/cart/item", customer_id);
    let cart_uri = format!("/api/customers/{}/cart", customer_id);

    for quantity in [3, 2] {
        let req = test::TestRequest::post()
            .uri(&item_uri)
            .insert_header(bearer(&token))
            .set_json(json!({"product_id": product_id, "quantity": quantity}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&cart_uri)
        .insert_header(bearer(&token))
        .to_request();
    let cart: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 5);
    assert_eq!(cart["items"][0]["product_name"], "Green Tea");
    assert_eq!(cart["items"][0]["subtotal"], "22.50");
    assert_eq!(cart["total_items"], 5);
    assert_eq!(cart["total_price"], "22.50");

    let req = test::TestRequest::put()
        .uri(&item_uri)
        .insert_header(bearer(&token))
        .set_json(json!({"product_id": product_id, "quantity": 1}))
        .to_request();
    let cart: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cart["total_items"], 1);
    assert_eq!(cart["total_price"], "4.50");

    let req = test::TestRequest::delete()
        .uri(&format!("{}/{}", item_uri, product_id))
        .insert_header(bearer(&token))
        .to_request();
    let cart: Value = test::call_and_read_body_json(&app, req).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert_eq!(cart["total_items"], 0);

    let req = test::TestRequest::delete()
        .uri(&format!("{}/{}", item_uri, product_id))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    for _ in 0..2 {
        let req = test::TestRequest::delete()
            .uri(&cart_uri)
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Cart cleared successfully");
    }

    let req = test::TestRequest::get()
        .uri(&cart_uri)
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "customer's cart is empty");
}

#[actix_web::test]
async fn test_add_unknown_product() {
    let app = test::init_service(app(state_with_limit(1000))).await;
    let body: Value =
        test::call_and_read_body_json(&app, register_request("ghost@example.com").to_request())
            .await;
    let (customer_id, token) = credentials(&body);

    let req = test::TestRequest::post()
        .uri(&format!("/api/customers/{}/cart/item", customer_id))
        .insert_header(bearer(&token))
        .set_json(json!({"product_id": uuid::Uuid::new_v4(), "quantity": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_zero_quantity_is_bad_request() {
    let app = test::init_service(app(state_with_limit(1000))).await;
    let body: Value =
        test::call_and_read_body_json(&app, register_request("zero@example.com").to_request())
            .await;
    let (customer_id, token) = credentials(&body);
    let product: Value =
        test::call_and_read_body_json(&app, product_request("Oolong", "7.00").to_request()).await;
    let product_id = product["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/customers/{}/cart/item", customer_id))
        .insert_header(bearer(&token))
        .set_json(json!({"product_id": product_id, "quantity": 0}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_overflowing_cart_quantity_is_bad_request() {
    let app = test::init_service(app(state_with_limit(1000))).await;
    let body: Value =
        test::call_and_read_body_json(&app, register_request("huge@example.com").to_request())
            .await;
    let (customer_id, token) = credentials(&body);
    let product: Value =
        test::call_and_read_body_json(&app, product_request("Oolong", "7.00").to_request()).await;
    let product_id = product["id"].as_str().unwrap();
    let uri = format!("/api/customers/{}/cart/item", customer_id);
    let add = || {
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({"product_id": product_id, "quantity": 3_000_000_000u32}))
            .to_request()
    };

    let resp = test::call_service(&app, add()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, add()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "cart quantity or total is too large");

    let req = test::TestRequest::get()
        .uri(&format!("/api/customers/{}/cart", customer_id))
        .insert_header(bearer(&token))
        .to_request();
    let cart: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cart["total_items"], 3_000_000_000u32);
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let app = test::init_service(app(state_with_limit(1000))).await;

    let req = test::TestRequest::post()
        .uri("/api/products")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_login_checks_password() {
    let app = test::init_service(app(state_with_limit(1000))).await;
    let resp = test::call_service(&app, register_request("login@example.com").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let wrong = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "login@example.com", "password": "incorrect"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, wrong).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let right = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "login@example.com", "password": "correct-horse"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, right).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["customer"]["email"], "login@example.com");
}

#[actix_web::test]
async fn test_duplicate_registration_conflicts() {
    let app = test::init_service(app(state_with_limit(1000))).await;
    let resp = test::call_service(&app, register_request("twice@example.com").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Again",
            "email": "twice@example.com",
            "password": "correct-horse"
        }))
        .to_request();

    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );
}

#[actix_web::test]
async fn test_product_reads_are_cached_until_write() {
    let app = test::init_service(app(state_with_limit(1000))).await;
    let resp = test::call_service(&app, product_request("Sencha", "3.20").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let get = || test::TestRequest::get().uri("/api/products").to_request();

    let first = test::call_service(&app, get()).await;
    assert_eq!(first.headers().get("X-Cache").unwrap(), "MISS");
    let second = test::call_service(&app, get()).await;
    assert_eq!(second.headers().get("X-Cache").unwrap(), "HIT");

    let resp = test::call_service(&app, product_request("Matcha", "9.90").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let third = test::call_service(&app, get()).await;
    assert_eq!(third.headers().get("X-Cache").unwrap(), "MISS");
    let body: Value = test::read_body_json(third).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_customer_partial_update() {
    let app = test::init_service(app(state_with_limit(1000))).await;

    let req = test::TestRequest::post()
        .uri("/api/customers")
        .set_json(json!({"name": "Dana", "email": "dana@example.com", "phone": "555"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/customers/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({"phone": "555-9999"}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["name"], "Dana");
    assert_eq!(updated["phone"], "555-9999");

    let req = test::TestRequest::put().uri(&uri).set_json(json!({})).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::delete().uri(&uri).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
