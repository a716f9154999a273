//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use cineflix_core::CatalogError;
use cineflix_core::ports::AuthError;
use cineflix_shared::{ErrorResponse, FieldError};
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Validation(Vec<FieldError>),
    /// The movie catalog failed; the message is safe to show.
    Upstream(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
            AppError::Upstream(detail) => ErrorResponse::bad_gateway(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::BadInput(field) => AppError::Validation(vec![FieldError {
                field: field.to_string(),
                message: format!("{} is required", field),
            }]),
            AuthError::TokenExpired | AuthError::InvalidToken(_) => AppError::Unauthorized,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err.status() {
            Some(404) => AppError::NotFound(err.to_string()),
            _ => {
                tracing::warn!(error = %err, "Movie catalog request failed");
                AppError::Upstream(err.to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_are_unauthorized() {
        for err in [AuthError::TokenExpired, AuthError::InvalidToken("bad signature".into())] {
            let app_err = AppError::from(err);
            assert!(matches!(app_err, AppError::Unauthorized));
            assert_eq!(app_err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_blank_field_is_validation_error() {
        let app_err = AppError::from(AuthError::BadInput("email"));
        assert_eq!(app_err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(matches!(&app_err, AppError::Validation(errors) if errors[0].field == "email"));
    }

    #[test]
    fn test_backend_failure_is_internal() {
        let app_err = AppError::from(AuthError::Backend("store unavailable".into()));
        assert_eq!(app_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_catalog_not_found_maps_to_404() {
        let err = CatalogError::Request {
            status: Some(404),
            message: "missing".into(),
        };
        assert_eq!(AppError::from(err).status_code(), StatusCode::NOT_FOUND);
    }
}
