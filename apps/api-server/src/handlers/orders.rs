//! Order CRUD.

use actix_web::{HttpResponse, web};
use rust_decimal::Decimal;
use uuid::Uuid;

use order_core::domain::{Order, OrderInput};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find(state: &AppState, id: Uuid) -> AppResult<Order> {
    state
        .orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
}

/// GET /api/orders
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let orders = state.orders.find_all().await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let order = find(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// POST /api/orders
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<OrderInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    if input.customer_id.is_empty() {
        return Err(AppError::BadRequest("customer_id is required".to_string()));
    }
    if input.product_ids.is_empty() {
        return Err(AppError::BadRequest(
            "An order needs at least one product".to_string(),
        ));
    }
    if input.total_amount < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "total_amount must not be negative".to_string(),
        ));
    }

    let saved = state.orders.save(Order::new(input)).await?;

    tracing::info!(
        order_id = %saved.id,
        customer_id = %saved.customer_id,
        products = saved.product_ids.len(),
        "Order created"
    );
    Ok(HttpResponse::Created().json(saved))
}

/// PUT /api/orders/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<OrderInput>,
) -> AppResult<HttpResponse> {
    let mut order = find(&state, path.into_inner()).await?;
    order.apply(body.into_inner());
    let saved = state.orders.save(order).await?;

    Ok(HttpResponse::Ok().json(saved))
}

/// DELETE /api/orders/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let order = find(&state, path.into_inner()).await?;
    state.orders.delete(order.id).await?;

    Ok(HttpResponse::Ok().json(order))
}
