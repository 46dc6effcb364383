//! JSON request/response types for the reservation ledger endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::reservation::Reservation;

/// Request to create a reservation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservationRequest {
    pub room_id: uuid::Uuid,
    pub showtime_id: uuid::Uuid,
    pub dni: String,
    /// Seat labels like "A1"; must be non-empty.
    pub seats: Vec<String>,
    pub total_cents: i64,
}

/// Reservation details.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationResponse {
    pub id: String,
    pub room_id: String,
    pub showtime_id: String,
    pub dni: String,
    pub seats: Vec<String>,
    pub total_cents: i64,
    pub status: String,
    pub created_at: String,
    pub cancelled_at: Option<String>,
}

impl From<&Reservation> for ReservationResponse {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: reservation.id().to_string(),
            room_id: reservation.room_id().to_string(),
            showtime_id: reservation.showtime_id().to_string(),
            dni: reservation.dni().to_string(),
            seats: reservation.seats().iter().map(|s| s.to_string()).collect(),
            total_cents: reservation.total_cents(),
            status: reservation.status().to_string(),
            created_at: reservation.created_at().as_datetime().to_rfc3339(),
            cancelled_at: reservation
                .cancelled_at()
                .map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

/// Response for a freshly created reservation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReservationResponse {
    pub reservation: ReservationResponse,
    /// Checkout redirect; null when the payment gateway was unreachable.
    /// The reservation is PENDING either way.
    pub redirect_url: Option<String>,
}
