//! Reservation ledger port - the seat-occupancy write side.
//!
//! The ledger owns the seat-occupancy record; no other component writes it.
//! Two contracts matter for correctness:
//!
//! - `create_pending` is a single atomic check-and-bind: concurrent calls
//!   targeting overlapping seats have exactly one winner, losers receive
//!   `SeatsUnavailable` naming the specific conflicting seats.
//! - `update_if_status` is compare-and-set on the reservation status, so a
//!   sweeper-expiry / user-cancel race also has exactly one winner; the
//!   loser sees `InvalidState`, never a double seat release.

use async_trait::async_trait;

use crate::domain::catalog::SeatLabel;
use crate::domain::foundation::{ReservationId, ShowtimeId, Timestamp};
use crate::domain::reservation::{
    Reservation, ReservationError, ReservationKey, ReservationStatus,
};

/// Repository port for Reservation aggregate persistence and seat binding.
#[async_trait]
pub trait ReservationLedger: Send + Sync {
    /// Atomically check that none of the reservation's seats is held by an
    /// active reservation for the same showtime, then persist the
    /// reservation (PENDING) and bind its seat holds.
    ///
    /// A PENDING hold past `pending_timeout_minutes` does not block the
    /// bind, matching what `seats_held` reports.
    ///
    /// # Errors
    ///
    /// - `SeatsUnavailable` listing exactly the conflicting seats
    async fn create_pending(
        &self,
        reservation: &Reservation,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<(), ReservationError>;

    /// Compare-and-set: persist `reservation`'s current state only if the
    /// stored status still equals `expected`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the reservation doesn't exist
    /// - `InvalidState` if the stored status no longer matches `expected`
    async fn update_if_status(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> Result<(), ReservationError>;

    /// Find a reservation by its surrogate ID. Returns `None` if not found.
    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, ReservationError>;

    /// Find a reservation by its natural key. Returns `None` if not found.
    async fn find_by_key(&self, key: &ReservationKey)
        -> Result<Option<Reservation>, ReservationError>;

    /// List all reservations, newest first.
    async fn list(&self) -> Result<Vec<Reservation>, ReservationError>;

    /// Seats held by reservations active at `now` for a showtime.
    ///
    /// Overdue PENDING reservations count as inactive even before the
    /// sweeper has expired them.
    async fn seats_held(
        &self,
        showtime_id: ShowtimeId,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<Vec<SeatLabel>, ReservationError>;

    /// PENDING reservations whose timeout has elapsed at `now`. Sweeper input.
    async fn find_overdue_pending(
        &self,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<Vec<Reservation>, ReservationError>;

    /// Count non-terminal reservations referencing a showtime. Guards
    /// showtime cancellation.
    async fn count_active_for_showtime(
        &self,
        showtime_id: ShowtimeId,
    ) -> Result<u64, ReservationError>;

    /// Hard delete (admin only).
    ///
    /// # Errors
    ///
    /// - `NotFound` if the reservation doesn't exist
    async fn delete(&self, id: ReservationId) -> Result<(), ReservationError>;
}
