//! Reservation aggregate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::errors::ReservationError;
use super::status::ReservationStatus;
use crate::domain::catalog::SeatLabel;
use crate::domain::foundation::{
    ActorRole, Dni, ReservationId, RoomId, ShowtimeId, StateMachine, Timestamp,
};

/// Natural key of a reservation: (room, showtime, holder DNI, creation time).
///
/// Unique per the ledger's storage constraint; kept alongside the surrogate
/// id so composite-key lookups from the HTTP surface stay cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationKey {
    pub room_id: RoomId,
    pub showtime_id: ShowtimeId,
    pub dni: Dni,
    pub created_at: Timestamp,
}

/// A reservation holding a non-empty seat set for one showtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    room_id: RoomId,
    showtime_id: ShowtimeId,
    dni: Dni,
    seats: BTreeSet<SeatLabel>,
    total_cents: i64,
    status: ReservationStatus,
    created_at: Timestamp,
    cancelled_at: Option<Timestamp>,
}

impl Reservation {
    /// Creates a new PENDING reservation.
    ///
    /// Seat validity against the room geometry and seat availability are the
    /// ledger's responsibility; this only enforces aggregate-local rules.
    pub fn new(
        room_id: RoomId,
        showtime_id: ShowtimeId,
        dni: Dni,
        seats: BTreeSet<SeatLabel>,
        total_cents: i64,
        now: Timestamp,
    ) -> Result<Self, ReservationError> {
        if seats.is_empty() {
            return Err(ReservationError::validation(
                "seats",
                "a reservation must hold at least one seat",
            ));
        }
        if total_cents < 0 {
            return Err(ReservationError::validation(
                "total",
                "total price cannot be negative",
            ));
        }
        Ok(Self {
            id: ReservationId::new(),
            room_id,
            showtime_id,
            dni,
            seats,
            total_cents,
            status: ReservationStatus::Pending,
            created_at: now,
            cancelled_at: None,
        })
    }

    /// Reconstructs a reservation from persisted state without validation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ReservationId,
        room_id: RoomId,
        showtime_id: ShowtimeId,
        dni: Dni,
        seats: BTreeSet<SeatLabel>,
        total_cents: i64,
        status: ReservationStatus,
        created_at: Timestamp,
        cancelled_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            room_id,
            showtime_id,
            dni,
            seats,
            total_cents,
            status,
            created_at,
            cancelled_at,
        }
    }

    /// Confirms the reservation (payment approved).
    ///
    /// Returns `true` when this call performed the transition and `false`
    /// when the reservation was already confirmed, so webhook redeliveries
    /// are no-op successes.
    pub fn confirm(&mut self) -> Result<bool, ReservationError> {
        if self.status == ReservationStatus::Confirmed {
            return Ok(false);
        }
        self.status = self
            .status
            .transition_to(ReservationStatus::Confirmed)
            .map_err(|_| ReservationError::invalid_state(self.status.as_str(), "confirm"))?;
        Ok(true)
    }

    /// Cancels the reservation.
    ///
    /// From PENDING: always allowed. From CONFIRMED: only while
    /// `now < showtime_starts_at - cutoff`, unless the actor is an admin.
    pub fn cancel(
        &mut self,
        actor: ActorRole,
        now: Timestamp,
        showtime_starts_at: Timestamp,
        cutoff_minutes: i64,
    ) -> Result<(), ReservationError> {
        if self.status == ReservationStatus::Confirmed && !actor.is_admin() {
            let cutoff = showtime_starts_at.minus_minutes(cutoff_minutes);
            if now >= cutoff {
                return Err(ReservationError::cutoff_passed(cutoff_minutes));
            }
        }
        self.status = self
            .status
            .transition_to(ReservationStatus::Cancelled)
            .map_err(|_| ReservationError::invalid_state(self.status.as_str(), "cancel"))?;
        self.cancelled_at = Some(now);
        Ok(())
    }

    /// Expires the reservation (sweeper action).
    ///
    /// Only valid from PENDING, and only once the pending timeout has fully
    /// elapsed since creation.
    pub fn expire(&mut self, now: Timestamp, pending_timeout_minutes: i64) -> Result<(), ReservationError> {
        if self.status != ReservationStatus::Pending {
            return Err(ReservationError::invalid_state(self.status.as_str(), "expire"));
        }
        if !self.is_overdue(now, pending_timeout_minutes) {
            return Err(ReservationError::invalid_state("pending", "expire before timeout"));
        }
        self.status = self
            .status
            .transition_to(ReservationStatus::Expired)
            .map_err(|_| ReservationError::invalid_state(self.status.as_str(), "expire"))?;
        Ok(())
    }

    /// True when a PENDING reservation has outlived the timeout.
    pub fn is_overdue(&self, now: Timestamp, pending_timeout_minutes: i64) -> bool {
        self.status == ReservationStatus::Pending
            && now >= self.created_at.plus_minutes(pending_timeout_minutes)
    }

    /// Whether the reservation still holds its seats at `now`.
    ///
    /// PENDING reservations past the timeout count as inactive even before
    /// the sweeper has run, so visible availability is never stale for
    /// longer than one read.
    pub fn is_active_at(&self, now: Timestamp, pending_timeout_minutes: i64) -> bool {
        match self.status {
            ReservationStatus::Confirmed => true,
            ReservationStatus::Pending => !self.is_overdue(now, pending_timeout_minutes),
            ReservationStatus::Cancelled | ReservationStatus::Expired => false,
        }
    }

    /// Natural key for composite lookups.
    pub fn key(&self) -> ReservationKey {
        ReservationKey {
            room_id: self.room_id,
            showtime_id: self.showtime_id,
            dni: self.dni.clone(),
            created_at: self.created_at,
        }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn showtime_id(&self) -> ShowtimeId {
        self.showtime_id
    }

    pub fn dni(&self) -> &Dni {
        &self.dni
    }

    pub fn seats(&self) -> &BTreeSet<SeatLabel> {
        &self.seats
    }

    pub fn total_cents(&self) -> i64 {
        self.total_cents
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn cancelled_at(&self) -> Option<Timestamp> {
        self.cancelled_at
    }
}
