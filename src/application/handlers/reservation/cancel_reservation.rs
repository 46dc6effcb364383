//! CancelReservationHandler - user or admin cancellation.

use std::sync::Arc;

use crate::domain::foundation::{ActorRole, Clock, EventId, SerializableDomainEvent};
use crate::domain::reservation::{
    Reservation, ReservationCancelled, ReservationError, ReservationKey,
};
use crate::ports::{EventPublisher, ReservationLedger, ShowtimeRepository, SystemParameters};

/// Command to cancel a reservation, addressed by its natural key.
#[derive(Debug, Clone)]
pub struct CancelReservationCommand {
    pub key: ReservationKey,
    pub actor: ActorRole,
}

/// Handler for reservation cancellation.
///
/// PENDING cancels always; CONFIRMED cancels are cutoff-gated unless the
/// actor is an admin. The compare-and-set persist means a race against the
/// sweeper has exactly one winner.
pub struct CancelReservationHandler {
    ledger: Arc<dyn ReservationLedger>,
    showtimes: Arc<dyn ShowtimeRepository>,
    params: Arc<dyn SystemParameters>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl CancelReservationHandler {
    pub fn new(
        ledger: Arc<dyn ReservationLedger>,
        showtimes: Arc<dyn ShowtimeRepository>,
        params: Arc<dyn SystemParameters>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            showtimes,
            params,
            events,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelReservationCommand,
    ) -> Result<Reservation, ReservationError> {
        let mut reservation = self
            .ledger
            .find_by_key(&cmd.key)
            .await?
            .ok_or(ReservationError::NotFoundByKey)?;

        let showtime = self
            .showtimes
            .find_by_id(reservation.showtime_id())
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?
            .ok_or(ReservationError::ShowtimeNotFound(reservation.showtime_id()))?;

        let policy = self
            .params
            .get()
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

        let now = self.clock.now();
        let previous_status = reservation.status();
        reservation.cancel(
            cmd.actor,
            now,
            showtime.starts_at(),
            policy.cancellation_cutoff_minutes,
        )?;

        self.ledger
            .update_if_status(&reservation, previous_status)
            .await?;

        let event = ReservationCancelled {
            event_id: EventId::new(),
            reservation_id: reservation.id(),
            cancelled_by_admin: cmd.actor.is_admin(),
            occurred_at: now,
        };
        self.events
            .publish(event.to_envelope())
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

        Ok(reservation)
    }
}
