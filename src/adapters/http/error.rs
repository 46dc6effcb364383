//! API error type shared by every HTTP module.
//!
//! Domain errors already carry an `ErrorCode`; this layer only decides the
//! HTTP status and the `{ "error": { code, message } }` body shape.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::reservation::ReservationError;
use crate::domain::scheduling::ScheduleError;

/// Error returned by HTTP handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::RoomNotFound
            | ErrorCode::ShowtimeNotFound
            | ErrorCode::ReservationNotFound => StatusCode::NOT_FOUND,

            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat
            | ErrorCode::InvalidGeometry
            | ErrorCode::InvalidSeat => StatusCode::BAD_REQUEST,

            ErrorCode::SeatUnavailable
            | ErrorCode::OverlapConflict
            | ErrorCode::HasActiveReservations
            | ErrorCode::RoomInUse
            | ErrorCode::ShowtimeExists
            | ErrorCode::InvalidStateTransition
            | ErrorCode::CutoffPassed
            | ErrorCode::ShowtimeStarted => StatusCode::CONFLICT,

            ErrorCode::Unauthorized | ErrorCode::InvalidWebhookSignature => {
                StatusCode::UNAUTHORIZED
            }
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,

            ErrorCode::PaymentFailed => StatusCode::PAYMENT_REQUIRED,

            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Standard error body: `{ "error": { "code": ..., "message": ... } }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message,
                details: self.details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        let mut api = Self::new(err.code(), err.message());
        if let Some(seats) = err.conflicting_seats() {
            let joined = seats
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            api = api.with_detail("seats", joined);
        }
        api
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self {
            code: err.code,
            message: err.message,
            details: err.details,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorCode::ValidationFailed, err.to_string())
    }
}
