use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use railgate_core::ReservationError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ServiceUnavailable(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    /// Maps the reservation failure taxonomy onto HTTP semantics. Business
    /// rules surface to the caller verbatim; infrastructure detail is
    /// logged and masked.
    pub fn reservation(err: ReservationError) -> Self {
        match err {
            ReservationError::TrainNotFound => AppError::NotFoundError(err.to_string()),
            ReservationError::SoldOut | ReservationError::ShrinkBelowBooked { .. } => {
                AppError::ValidationError(err.to_string())
            }
            ReservationError::Transient(_) => AppError::ServiceUnavailable(err.to_string()),
            ReservationError::Storage(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Transient failure surfaced to caller: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Temporarily unavailable, please retry.".to_string(),
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
