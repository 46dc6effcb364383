//! Reservation-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | ShowtimeNotFound | 404 |
//! | RoomNotFound | 404 |
//! | SeatsUnavailable | 409 |
//! | InvalidSeats | 400 |
//! | ShowtimeStarted | 409 |
//! | InvalidState | 409 |
//! | CutoffPassed | 409 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::catalog::SeatLabel;
use crate::domain::foundation::{
    DomainError, ErrorCode, ReservationId, RoomId, ShowtimeId, ValidationError,
};

/// Errors raised by reservation ledger operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// Reservation was not found.
    NotFound(ReservationId),

    /// No reservation matches the composite natural key.
    NotFoundByKey,

    /// The requested seats are already held by an active reservation.
    /// Names exactly the conflicting seats so the client can re-render
    /// its seat selection.
    SeatsUnavailable(Vec<SeatLabel>),

    /// Requested seats fall outside the room geometry.
    InvalidSeats(Vec<SeatLabel>),

    /// The referenced showtime does not exist.
    ShowtimeNotFound(ShowtimeId),

    /// The referenced room does not exist.
    RoomNotFound(RoomId),

    /// The showtime starts too soon (or has started) for this operation.
    ShowtimeStarted(ShowtimeId),

    /// Invalid state for the requested transition.
    InvalidState { current: String, attempted: String },

    /// Cancellation window for a confirmed reservation has closed.
    CutoffPassed { cutoff_minutes: i64 },

    /// Caller lacks the required role.
    Forbidden { action: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl ReservationError {
    pub fn not_found(id: ReservationId) -> Self {
        ReservationError::NotFound(id)
    }

    pub fn seats_unavailable(mut seats: Vec<SeatLabel>) -> Self {
        seats.sort();
        seats.dedup();
        ReservationError::SeatsUnavailable(seats)
    }

    pub fn invalid_seats(mut seats: Vec<SeatLabel>) -> Self {
        seats.sort();
        seats.dedup();
        ReservationError::InvalidSeats(seats)
    }

    pub fn showtime_not_found(id: ShowtimeId) -> Self {
        ReservationError::ShowtimeNotFound(id)
    }

    pub fn room_not_found(id: RoomId) -> Self {
        ReservationError::RoomNotFound(id)
    }

    pub fn showtime_started(id: ShowtimeId) -> Self {
        ReservationError::ShowtimeStarted(id)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        ReservationError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn cutoff_passed(cutoff_minutes: i64) -> Self {
        ReservationError::CutoffPassed { cutoff_minutes }
    }

    pub fn forbidden(action: impl Into<String>) -> Self {
        ReservationError::Forbidden {
            action: action.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReservationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ReservationError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReservationError::NotFound(_) | ReservationError::NotFoundByKey => {
                ErrorCode::ReservationNotFound
            }
            ReservationError::SeatsUnavailable(_) => ErrorCode::SeatUnavailable,
            ReservationError::InvalidSeats(_) => ErrorCode::InvalidSeat,
            ReservationError::ShowtimeNotFound(_) => ErrorCode::ShowtimeNotFound,
            ReservationError::RoomNotFound(_) => ErrorCode::RoomNotFound,
            ReservationError::ShowtimeStarted(_) => ErrorCode::ShowtimeStarted,
            ReservationError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            ReservationError::CutoffPassed { .. } => ErrorCode::CutoffPassed,
            ReservationError::Forbidden { .. } => ErrorCode::Forbidden,
            ReservationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ReservationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            ReservationError::NotFound(id) => format!("Reservation not found: {}", id),
            ReservationError::NotFoundByKey => {
                "No reservation matches the given room, showtime, DNI and creation time"
                    .to_string()
            }
            ReservationError::SeatsUnavailable(seats) => {
                format!("Seats unavailable: {}", join_seats(seats))
            }
            ReservationError::InvalidSeats(seats) => {
                format!("Seats outside room geometry: {}", join_seats(seats))
            }
            ReservationError::ShowtimeNotFound(id) => format!("Showtime not found: {}", id),
            ReservationError::RoomNotFound(id) => format!("Room not found: {}", id),
            ReservationError::ShowtimeStarted(id) => {
                format!("Showtime {} is too close to start or already started", id)
            }
            ReservationError::InvalidState { current, attempted } => {
                format!("Cannot {} reservation in {} state", attempted, current)
            }
            ReservationError::CutoffPassed { cutoff_minutes } => format!(
                "Confirmed reservations cannot be cancelled within {} minutes of the showtime",
                cutoff_minutes
            ),
            ReservationError::Forbidden { action } => {
                format!("Only administrators may {}", action)
            }
            ReservationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ReservationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// The conflicting seats, when this is a seat conflict.
    pub fn conflicting_seats(&self) -> Option<&[SeatLabel]> {
        match self {
            ReservationError::SeatsUnavailable(seats) => Some(seats),
            _ => None,
        }
    }
}

fn join_seats(seats: &[SeatLabel]) -> String {
    seats
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::fmt::Display for ReservationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ReservationError {}

impl From<ValidationError> for ReservationError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => {
                ReservationError::validation(field.clone(), err.to_string())
            }
        }
    }
}

impl From<ReservationError> for DomainError {
    fn from(err: ReservationError) -> Self {
        let mut domain = DomainError::new(err.code(), err.message());
        if let Some(seats) = err.conflicting_seats() {
            domain = domain.with_detail("seats", join_seats(seats));
        }
        domain
    }
}
