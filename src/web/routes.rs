// src/web/routes.rs

use actix_web::web;

// In a real deployment a load balancer polls this; it deliberately avoids
// touching the database.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function is called in `main.rs` (and by the HTTP tests) to configure
// services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  use crate::web::handlers::{auth_handlers, cart_handlers, category_handlers, product_handlers};

  cfg
    // Health Check Route
    .route("/health", web::get().to(health_check_handler))
    // Authentication Routes
    .service(
      web::scope("/auth")
        .route("/signup", web::post().to(auth_handlers::signup_handler))
        .route("/signin", web::post().to(auth_handlers::signin_handler))
        .route("/refresh", web::post().to(auth_handlers::refresh_handler)),
    )
    // Category taxonomy (admin surface)
    .service(
      web::scope("/categories")
        .route("", web::post().to(category_handlers::create_category_handler))
        .route("", web::get().to(category_handlers::list_categories_handler))
        .route("/{id}", web::patch().to(category_handlers::update_category_handler))
        .route("/{id}", web::delete().to(category_handlers::delete_category_handler)),
    )
    // Product catalog
    .service(
      web::scope("/products")
        .route("", web::post().to(product_handlers::create_product_handler))
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("/{id}", web::patch().to(product_handlers::update_product_handler))
        .route("/{id}", web::delete().to(product_handlers::delete_product_handler)),
    )
    // Shopping cart (customer surface)
    .service(
      web::scope("/cart")
        .route("", web::post().to(cart_handlers::add_to_cart_handler))
        .route("", web::get().to(cart_handlers::get_cart_handler))
        .route("", web::delete().to(cart_handlers::remove_cart_item_handler)),
    );
}
