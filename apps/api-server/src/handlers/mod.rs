//! HTTP handlers and route configuration.

mod auth;
mod cart;
mod customers;
mod health;
mod orders;
mod products;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, error::JsonPayloadError, web};

use crate::middleware::error::AppError;

/// Reject malformed JSON bodies with a problem-details 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login)),
                )
                .service(
                    web::scope("/customers")
                        .route("", web::get().to(customers::list))
                        .route("", web::post().to(customers::create))
                        .route("/{id}", web::get().to(customers::get))
                        .route("/{id}", web::put().to(customers::update))
                        .route("/{id}", web::delete().to(customers::delete))
                        .route("/{id}/cart", web::get().to(cart::get_cart))
                        .route("/{id}/cart", web::delete().to(cart::clear_cart))
                        .route("/{id}/cart/item", web::post().to(cart::add_item))
                        .route("/{id}/cart/item", web::put().to(cart::update_item))
                        .route(
                            "/{id}/cart/item/{product_id}",
                            web::delete().to(cart::remove_item),
                        ),
                )
                .service(
                    web::scope("/products")
                        .route("", web::get().to(products::list))
                        .route("", web::post().to(products::create))
                        .route("/{id}", web::get().to(products::get))
                        .route("/{id}", web::put().to(products::update))
                        .route("/{id}", web::delete().to(products::delete)),
                )
                .service(
                    web::scope("/orders")
                        .route("", web::get().to(orders::list))
                        .route("", web::post().to(orders::create))
                        .route("/{id}", web::get().to(orders::get))
                        .route("/{id}", web::put().to(orders::update))
                        .route("/{id}", web::delete().to(orders::delete)),
                ),
        );
}
