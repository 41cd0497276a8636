// tests/api_tests.rs

//! HTTP-surface tests that do not need a running database: authentication
//! gating, input validation, and token refresh. The pool is constructed
//! lazily, so a handler rejecting a request before its first query never
//! opens a connection.

use actix_web::{http::StatusCode, test, web, App};
use std::sync::Arc;

use flourish::config::AppConfig;
use flourish::models::Role;
use flourish::services::image_store_mock::MockImageStore;
use flourish::services::token_service::{self, Claims};
use flourish::state::AppState;
use flourish::web::configure_app_routes;

const JWT_SECRET: &str = "api-test-secret";

fn test_state() -> AppState {
  let config = AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "postgres://localhost/flourish_unreachable".to_string(),
    app_base_url: "http://127.0.0.1:0".to_string(),
    jwt_secret: JWT_SECRET.to_string(),
    storage: None,
    run_migrations: false,
  };
  AppState {
    db_pool: sqlx::PgPool::connect_lazy(&config.database_url).expect("lazy pool"),
    config: Arc::new(config),
    image_store: Arc::new(MockImageStore::new()),
  }
}

fn customer_token() -> String {
  let claims = Claims {
    sub: uuid::Uuid::new_v4(),
    username: "budi".to_string(),
    email: "budi@example.com".to_string(),
    role: Role::Customer,
    exp: chrono::Utc::now().timestamp() + 24 * 60 * 60,
  };
  token_service::sign(&claims, JWT_SECRET).unwrap()
}

macro_rules! test_app {
  () => {
    test::init_service(
      App::new()
        .app_data(web::Data::new(test_state()))
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn health_returns_ok() {
  let app = test_app!();
  let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: serde_json::Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn get_cart_without_token_is_unauthorized() {
  let app = test_app!();
  let resp = test::call_service(&app, test::TestRequest::get().uri("/cart").to_request()).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn get_cart_with_garbage_token_is_unauthorized() {
  let app = test_app!();
  let req = test::TestRequest::get()
    .uri("/cart")
    .insert_header(("Authorization", "Bearer not-a-jwt"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn get_cart_with_expired_token_is_unauthorized() {
  let app = test_app!();
  let claims = Claims {
    sub: uuid::Uuid::new_v4(),
    username: "budi".to_string(),
    email: "budi@example.com".to_string(),
    role: Role::Customer,
    exp: chrono::Utc::now().timestamp() - 3600,
  };
  let token = token_service::sign(&claims, JWT_SECRET).unwrap();

  let req = test::TestRequest::get()
    .uri("/cart")
    .insert_header(("Authorization", format!("Bearer {token}")))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn remove_cart_item_without_item_id_is_bad_request() {
  let app = test_app!();
  let req = test::TestRequest::delete()
    .uri("/cart")
    .insert_header(("Authorization", format!("Bearer {}", customer_token())))
    .set_json(serde_json::json!({}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: serde_json::Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Item ID is required");
}

#[actix_web::test]
async fn add_to_cart_with_non_positive_quantity_is_bad_request() {
  let app = test_app!();
  for quantity in [0, -2] {
    let req = test::TestRequest::post()
      .uri("/cart")
      .set_json(serde_json::json!({
        "userId": uuid::Uuid::new_v4(),
        "productId": 1,
        "quantity": quantity
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "quantity {quantity}");
  }
}

#[actix_web::test]
async fn refresh_reissues_a_valid_token() {
  let app = test_app!();
  let req = test::TestRequest::post()
    .uri("/auth/refresh")
    .insert_header(("Authorization", format!("Bearer {}", customer_token())))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: serde_json::Value = test::read_body_json(resp).await;
  let token = body["token"].as_str().expect("token in response");
  let claims = token_service::verify(token, JWT_SECRET).unwrap();
  assert_eq!(claims.username, "budi");
}

#[actix_web::test]
async fn signup_with_short_password_is_bad_request() {
  let app = test_app!();
  let req = test::TestRequest::post()
    .uri("/auth/signup")
    .set_json(serde_json::json!({
      "username": "budi",
      "email": "budi@example.com",
      "password": "short",
      "confirmPassword": "short"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> String {
  let mut body = String::new();
  for (name, value) in fields {
    body.push_str(&format!(
      "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
    ));
  }
  body.push_str(&format!("--{boundary}--\r\n"));
  body
}

#[actix_web::test]
async fn create_product_without_image_is_bad_request() {
  let app = test_app!();
  let boundary = "test-boundary";
  let body = multipart_body(
    boundary,
    &[
      ("name", "Brownie"),
      ("price", "20000"),
      ("description", "Fudgy"),
      ("stock", "5"),
    ],
  );
  let req = test::TestRequest::post()
    .uri("/products")
    .insert_header(("content-type", format!("multipart/form-data; boundary={boundary}")))
    .set_payload(body)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: serde_json::Value = test::read_body_json(resp).await;
  assert!(
    body["error"].as_str().unwrap_or_default().contains("imageFile"),
    "{body}"
  );
}

#[actix_web::test]
async fn create_product_with_zero_price_is_bad_request() {
  let app = test_app!();
  let boundary = "test-boundary";
  let body = multipart_body(
    boundary,
    &[
      ("name", "Brownie"),
      ("price", "0"),
      ("description", "Fudgy"),
      ("stock", "0"),
    ],
  );
  let req = test::TestRequest::post()
    .uri("/products")
    .insert_header(("content-type", format!("multipart/form-data; boundary={boundary}")))
    .set_payload(body)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: serde_json::Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap_or_default().contains("price"), "{body}");
}
