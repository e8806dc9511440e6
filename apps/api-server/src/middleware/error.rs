//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use order_core::error::{CartError, DomainError, RepoError};
use order_core::ports::AuthError;
use order_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Repo(e) => e.into(),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Decode(msg) => {
                tracing::error!("Stored document decode error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ProductNotFound(_) | CartError::CartNotFound | CartError::ItemNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CartError::InvalidQuantity | CartError::QuantityTooLarge => {
                AppError::BadRequest(err.to_string())
            }
            // A failed cart write is always a server fault, even a store-level NotFound.
            CartError::Store(e) => {
                tracing::error!(error = %e, "Cart store failure");
                AppError::Internal("Cart store error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(msg) => AppError::Internal(msg),
            _ => AppError::Unauthorized,
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_errors_map_to_status() {
        let cases = [
            (CartError::CartNotFound, StatusCode::NOT_FOUND),
            (CartError::ItemNotFound("p1".into()), StatusCode::NOT_FOUND),
            (CartError::ProductNotFound("p1".into()), StatusCode::NOT_FOUND),
            (CartError::InvalidQuantity, StatusCode::BAD_REQUEST),
            (CartError::QuantityTooLarge, StatusCode::BAD_REQUEST),
            (
                CartError::Store(RepoError::NotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_empty_cart_message_reaches_client() {
        let err = AppError::from(CartError::CartNotFound);

        assert_eq!(err.to_string(), "Not found: customer's cart is empty");
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = AppError::from(RepoError::Constraint("email taken".into()));

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
