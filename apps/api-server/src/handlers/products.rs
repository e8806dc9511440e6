//! Product CRUD. Reads are served from the response cache for 15 minutes;
//! every write drops all cached product entries.

use std::time::Duration;

use actix_web::{HttpResponse, web};
use rust_decimal::Decimal;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use order_core::domain::{Product, ProductInput};
use order_core::ports::Cache;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const CACHE_TTL: Duration = Duration::from_secs(15 * 60);
const CACHE_PREFIX: &str = "products:";
const CACHE_HEADER: &str = "X-Cache";

fn list_key() -> String {
    format!("{CACHE_PREFIX}all")
}

fn item_key(id: Uuid) -> String {
    format!("{CACHE_PREFIX}{id}")
}

async fn cached<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    let raw = cache.get(key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
            None
        }
    }
}

async fn remember<T: Serialize>(cache: &dyn Cache, key: &str, value: &T) {
    let result = match serde_json::to_string(value) {
        Ok(raw) => cache.set(key, &raw, Some(CACHE_TTL)).await,
        Err(e) => {
            tracing::warn!(key, error = %e, "Product not cacheable");
            return;
        }
    };
    if let Err(e) = result {
        tracing::warn!(key, error = %e, "Cache write failed");
    }
}

async fn invalidate(cache: &dyn Cache) {
    if let Err(e) = cache.delete_prefix(CACHE_PREFIX).await {
        tracing::warn!(error = %e, "Product cache invalidation failed");
    }
}

async fn find(state: &AppState, id: Uuid) -> AppResult<Product> {
    state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
}

/// GET /api/products
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let key = list_key();
    if let Some(products) = cached::<Vec<Product>>(state.cache.as_ref(), &key).await {
        return Ok(HttpResponse::Ok()
            .insert_header((CACHE_HEADER, "HIT"))
            .json(products));
    }

    let products = state.products.find_all().await?;
    remember(state.cache.as_ref(), &key, &products).await;

    Ok(HttpResponse::Ok()
        .insert_header((CACHE_HEADER, "MISS"))
        .json(products))
}

/// GET /api/products/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let key = item_key(id);
    if let Some(product) = cached::<Product>(state.cache.as_ref(), &key).await {
        return Ok(HttpResponse::Ok()
            .insert_header((CACHE_HEADER, "HIT"))
            .json(product));
    }

    let product = find(&state, id).await?;
    remember(state.cache.as_ref(), &key, &product).await;

    Ok(HttpResponse::Ok()
        .insert_header((CACHE_HEADER, "MISS"))
        .json(product))
}

/// POST /api/products
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<ProductInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if input.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("Price must be positive".to_string()));
    }

    let product = Product::new(input.name, input.price, input.stock.max(0));
    let saved = state.products.save(product).await?;
    invalidate(state.cache.as_ref()).await;

    tracing::info!(product_id = %saved.id, "Product created");
    Ok(HttpResponse::Created().json(saved))
}

/// PUT /api/products/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ProductInput>,
) -> AppResult<HttpResponse> {
    let mut product = find(&state, path.into_inner()).await?;
    product.apply(body.into_inner());
    let saved = state.products.save(product).await?;
    invalidate(state.cache.as_ref()).await;

    Ok(HttpResponse::Ok().json(saved))
}

/// DELETE /api/products/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let product = find(&state, path.into_inner()).await?;
    state.products.delete(product.id).await?;
    invalidate(state.cache.as_ref()).await;

    Ok(HttpResponse::Ok().json(product))
}
