//! Catalog-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | InvalidGeometry | 400 |
//! | RoomInUse | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, ValidationError};

/// Errors raised by room catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Room was not found.
    NotFound(RoomId),

    /// Row/seat bounds or VIP set are inconsistent with the room geometry.
    InvalidGeometry { reason: String },

    /// Room still has showtimes referencing it.
    RoomInUse(RoomId),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl CatalogError {
    pub fn not_found(id: RoomId) -> Self {
        CatalogError::NotFound(id)
    }

    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        CatalogError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    pub fn room_in_use(id: RoomId) -> Self {
        CatalogError::RoomInUse(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CatalogError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::NotFound(_) => ErrorCode::RoomNotFound,
            CatalogError::InvalidGeometry { .. } => ErrorCode::InvalidGeometry,
            CatalogError::RoomInUse(_) => ErrorCode::RoomInUse,
            CatalogError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CatalogError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            CatalogError::NotFound(id) => format!("Room not found: {}", id),
            CatalogError::InvalidGeometry { reason } => {
                format!("Invalid room geometry: {}", reason)
            }
            CatalogError::RoomInUse(id) => {
                format!("Room {} still has showtimes scheduled", id)
            }
            CatalogError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            CatalogError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CatalogError {}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => {
                CatalogError::validation(field.clone(), err.to_string())
            }
        }
    }
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
