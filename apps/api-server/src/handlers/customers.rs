//! Customer CRUD.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use order_core::domain::{Customer, CustomerInput};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find(state: &AppState, id: Uuid) -> AppResult<Customer> {
    state
        .customers
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
}

/// GET /api/customers
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let customers = state.customers.find_all().await?;
    Ok(HttpResponse::Ok().json(customers))
}

/// GET /api/customers/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let customer = find(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

/// POST /api/customers
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CustomerInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if !input.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    let saved = state
        .customers
        .save(Customer::new(input.name, input.email, input.phone))
        .await?;

    tracing::info!(customer_id = %saved.id, "Customer created");
    Ok(HttpResponse::Created().json(saved))
}

/// PUT /api/customers/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CustomerInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    if input.name.is_empty() && input.email.is_empty() && input.phone.is_empty() {
        return Err(AppError::BadRequest(
            "At least one field must be provided for update".to_string(),
        ));
    }

    let mut customer = find(&state, path.into_inner()).await?;
    customer.apply(input);
    let saved = state.customers.save(customer).await?;

    Ok(HttpResponse::Ok().json(saved))
}

/// DELETE /api/customers/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let customer = find(&state, path.into_inner()).await?;
    state.customers.delete(customer.id).await?;

    tracing::info!(customer_id = %customer.id, "Customer deleted");
    Ok(HttpResponse::Ok().json(customer))
}
