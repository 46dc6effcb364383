//! In-memory reservation ledger.
//!
//! One mutex guards the whole map: every call runs in its own critical
//! section, which gives the check-and-bind and compare-and-set contracts
//! for free.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::catalog::SeatLabel;
use crate::domain::foundation::{ReservationId, ShowtimeId, Timestamp};
use crate::domain::reservation::{
    Reservation, ReservationError, ReservationKey, ReservationStatus,
};
use crate::ports::ReservationLedger;

#[derive(Default)]
pub struct InMemoryReservationLedger {
    reservations: Mutex<HashMap<ReservationId, Reservation>>,
}

impl InMemoryReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationLedger for InMemoryReservationLedger {
    async fn create_pending(
        &self,
        reservation: &Reservation,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<(), ReservationError> {
        let mut reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());

        let conflicts: Vec<SeatLabel> = reservations
            .values()
            .filter(|r| {
                r.showtime_id() == reservation.showtime_id()
                    && r.is_active_at(now, pending_timeout_minutes)
            })
            .flat_map(|r| r.seats().iter().copied())
            .filter(|seat| reservation.seats().contains(seat))
            .collect();

        if !conflicts.is_empty() {
            return Err(ReservationError::seats_unavailable(conflicts));
        }

        reservations.insert(reservation.id(), reservation.clone());
        Ok(())
    }

    async fn update_if_status(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> Result<(), ReservationError> {
        let mut reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());
        let stored = reservations
            .get_mut(&reservation.id())
            .ok_or(ReservationError::NotFound(reservation.id()))?;

        if stored.status() != expected {
            return Err(ReservationError::invalid_state(
                stored.status().as_str(),
                format!("transition to {}", reservation.status()),
            ));
        }

        *stored = reservation.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationError> {
        let reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());
        Ok(reservations.get(&id).cloned())
    }

    async fn find_by_key(
        &self,
        key: &ReservationKey,
    ) -> Result<Option<Reservation>, ReservationError> {
        let reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());
        Ok(reservations.values().find(|r| r.key() == *key).cloned())
    }

    async fn list(&self) -> Result<Vec<Reservation>, ReservationError> {
        let reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Reservation> = reservations.values().cloned().collect();
        out.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(out)
    }

    async fn seats_held(
        &self,
        showtime_id: ShowtimeId,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<Vec<SeatLabel>, ReservationError> {
        let reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());
        let mut seats: Vec<SeatLabel> = reservations
            .values()
            .filter(|r| {
                r.showtime_id() == showtime_id && r.is_active_at(now, pending_timeout_minutes)
            })
            .flat_map(|r| r.seats().iter().copied())
            .collect();
        seats.sort();
        seats.dedup();
        Ok(seats)
    }

    async fn find_overdue_pending(
        &self,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<Vec<Reservation>, ReservationError> {
        let reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Reservation> = reservations
            .values()
            .filter(|r| r.is_overdue(now, pending_timeout_minutes))
            .cloned()
            .collect();
        out.sort_by_key(|r| r.created_at());
        Ok(out)
    }

    async fn count_active_for_showtime(
        &self,
        showtime_id: ShowtimeId,
    ) -> Result<u64, ReservationError> {
        let reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());
        Ok(reservations
            .values()
            .filter(|r| r.showtime_id() == showtime_id && r.status().is_active())
            .count() as u64)
    }

    async fn delete(&self, id: ReservationId) -> Result<(), ReservationError> {
        let mut reservations = self.reservations.lock().unwrap_or_else(|e| e.into_inner());
        reservations
            .remove(&id)
            .map(|_| ())
            .ok_or(ReservationError::NotFound(id))
    }
}
