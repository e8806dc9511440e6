//! Registration and login.

use actix_web::{HttpResponse, web};

use order_core::domain::Customer;
use order_shared::dto::{AuthResponse, CustomerResponse, LoginRequest, RegisterRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const CUSTOMER_ROLE: &str = "customer";

fn customer_response(customer: &Customer) -> CustomerResponse {
    CustomerResponse {
        id: customer.id,
        name: customer.name.clone(),
        email: customer.email.clone(),
        phone: customer.phone.clone(),
    }
}

fn issue(state: &AppState, customer: &Customer) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(customer.id, &customer.email, vec![CUSTOMER_ROLE.to_string()])?;
    let expires_in = u64::try_from(state.tokens.expiration_seconds()).unwrap_or(0);

    Ok(AuthResponse::bearer(
        customer_response(customer),
        token,
        expires_in,
    ))
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if state.customers.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let customer =
        Customer::new(req.name, req.email, req.phone).with_password_hash(password_hash);
    let saved = state.customers.save(customer).await?;

    tracing::info!(customer_id = %saved.id, "Customer registered");

    Ok(HttpResponse::Created().json(issue(&state, &saved)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let customer = state
        .customers
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Customers created through the admin CRUD routes have no password.
    let hash = customer
        .password_hash
        .as_deref()
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&req.password, hash)? {
        tracing::debug!(customer_id = %customer.id, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(issue(&state, &customer)?))
}
