//! Scheduling-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | RoomNotFound | 404 |
//! | OverlapConflict | 409 |
//! | AlreadyScheduled | 409 |
//! | HasActiveReservations | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, ShowtimeId, ValidationError};

/// Errors raised by showtime registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Showtime was not found.
    NotFound(ShowtimeId),

    /// The referenced room does not exist.
    RoomNotFound(RoomId),

    /// The requested slot intersects an existing showtime in the same room.
    OverlapConflict {
        room_id: RoomId,
        conflicting: ShowtimeId,
    },

    /// A showtime already exists for this exact (room, start) pair.
    AlreadyScheduled { room_id: RoomId },

    /// The showtime still has non-terminal reservations.
    HasActiveReservations(ShowtimeId),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl ScheduleError {
    pub fn not_found(id: ShowtimeId) -> Self {
        ScheduleError::NotFound(id)
    }

    pub fn room_not_found(id: RoomId) -> Self {
        ScheduleError::RoomNotFound(id)
    }

    pub fn overlap_conflict(room_id: RoomId, conflicting: ShowtimeId) -> Self {
        ScheduleError::OverlapConflict {
            room_id,
            conflicting,
        }
    }

    pub fn already_scheduled(room_id: RoomId) -> Self {
        ScheduleError::AlreadyScheduled { room_id }
    }

    pub fn has_active_reservations(id: ShowtimeId) -> Self {
        ScheduleError::HasActiveReservations(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ScheduleError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ScheduleError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ScheduleError::NotFound(_) => ErrorCode::ShowtimeNotFound,
            ScheduleError::RoomNotFound(_) => ErrorCode::RoomNotFound,
            ScheduleError::OverlapConflict { .. } => ErrorCode::OverlapConflict,
            ScheduleError::AlreadyScheduled { .. } => ErrorCode::ShowtimeExists,
            ScheduleError::HasActiveReservations(_) => ErrorCode::HasActiveReservations,
            ScheduleError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ScheduleError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            ScheduleError::NotFound(id) => format!("Showtime not found: {}", id),
            ScheduleError::RoomNotFound(id) => format!("Room not found: {}", id),
            ScheduleError::OverlapConflict { room_id, conflicting } => format!(
                "Requested slot in room {} overlaps showtime {}",
                room_id, conflicting
            ),
            ScheduleError::AlreadyScheduled { room_id } => {
                format!("Room {} already has a showtime at that start time", room_id)
            }
            ScheduleError::HasActiveReservations(id) => {
                format!("Showtime {} has active reservations", id)
            }
            ScheduleError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ScheduleError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ScheduleError {}

impl From<ValidationError> for ScheduleError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => {
                ScheduleError::validation(field.clone(), err.to_string())
            }
        }
    }
}

impl From<ScheduleError> for DomainError {
    fn from(err: ScheduleError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
