//! Domain events emitted by the reservation ledger.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::SeatLabel;
use crate::domain::foundation::{
    DomainEvent, EventId, ReservationId, ShowtimeId, Timestamp,
};

/// A reservation was created in PENDING state and its seats bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreated {
    pub event_id: EventId,
    pub reservation_id: ReservationId,
    pub showtime_id: ShowtimeId,
    pub seats: Vec<SeatLabel>,
    pub total_cents: i64,
    pub occurred_at: Timestamp,
}

impl DomainEvent for ReservationCreated {
    fn event_type(&self) -> &'static str {
        "reservation.created.v1"
    }

    fn aggregate_id(&self) -> String {
        self.reservation_id.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Reservation"
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id.clone()
    }
}

/// Payment was approved and the reservation confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfirmed {
    pub event_id: EventId,
    pub reservation_id: ReservationId,
    pub occurred_at: Timestamp,
}

impl DomainEvent for ReservationConfirmed {
    fn event_type(&self) -> &'static str {
        "reservation.confirmed.v1"
    }

    fn aggregate_id(&self) -> String {
        self.reservation_id.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Reservation"
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id.clone()
    }
}

/// A reservation was cancelled and its seats released.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCancelled {
    pub event_id: EventId,
    pub reservation_id: ReservationId,
    pub cancelled_by_admin: bool,
    pub occurred_at: Timestamp,
}

impl DomainEvent for ReservationCancelled {
    fn event_type(&self) -> &'static str {
        "reservation.cancelled.v1"
    }

    fn aggregate_id(&self) -> String {
        self.reservation_id.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Reservation"
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id.clone()
    }
}

/// The sweeper reclaimed a stale PENDING reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationExpired {
    pub event_id: EventId,
    pub reservation_id: ReservationId,
    pub occurred_at: Timestamp,
}

impl DomainEvent for ReservationExpired {
    fn event_type(&self) -> &'static str {
        "reservation.expired.v1"
    }

    fn aggregate_id(&self) -> String {
        self.reservation_id.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Reservation"
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id.clone()
    }
}
