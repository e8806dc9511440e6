//! Cart endpoints. All of them require a bearer token.

use actix_web::{HttpResponse, web};

use order_core::services::CartItemInput;
use order_shared::MessageResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/customers/{id}/cart/item
pub async fn add_item(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CartItemInput>,
) -> AppResult<HttpResponse> {
    let customer_id = path.into_inner();
    tracing::debug!(caller = %identity.customer_id, customer_id = %customer_id, "Add to cart");

    let cart = state.carts.add_to_cart(&customer_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cart))
}

/// GET /api/customers/{id}/cart
pub async fn get_cart(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let cart = state.carts.get_cart_by_customer_id(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cart))
}

/// PUT /api/customers/{id}/cart/item
pub async fn update_item(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CartItemInput>,
) -> AppResult<HttpResponse> {
    let customer_id = path.into_inner();
    let input = body.into_inner();
    tracing::debug!(
        caller = %identity.customer_id,
        customer_id = %customer_id,
        product_id = %input.product_id,
        quantity = input.quantity,
        "Update cart item"
    );

    let cart = state
        .carts
        .update_cart_item(&customer_id, &input.product_id, input.quantity)
        .await?;
    Ok(HttpResponse::Ok().json(cart))
}

/// DELETE /api/customers/{id}/cart/item/{product_id}
pub async fn remove_item(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (customer_id, product_id) = path.into_inner();
    tracing::debug!(
        caller = %identity.customer_id,
        customer_id = %customer_id,
        product_id = %product_id,
        "Remove cart item"
    );

    let cart = state.carts.remove_cart_item(&customer_id, &product_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

/// DELETE /api/customers/{id}/cart
pub async fn clear_cart(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let customer_id = path.into_inner();
    let outcome = state.carts.clear_cart(&customer_id).await?;
    tracing::debug!(
        caller = %identity.customer_id,
        customer_id = %customer_id,
        ?outcome,
        "Clear cart"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("Cart cleared successfully")))
}
