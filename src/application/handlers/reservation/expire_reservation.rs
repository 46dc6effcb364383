//! ExpireReservationHandler - sweeper-driven PENDING to EXPIRED.

use std::sync::Arc;

use crate::domain::foundation::{Clock, EventId, ReservationId, SerializableDomainEvent};
use crate::domain::reservation::{
    Reservation, ReservationError, ReservationExpired, ReservationStatus,
};
use crate::ports::{EventPublisher, ReservationLedger, SystemParameters};

/// Command to expire a reservation.
#[derive(Debug, Clone)]
pub struct ExpireReservationCommand {
    pub reservation_id: ReservationId,
}

/// Handler for expiring stale PENDING reservations.
///
/// The compare-and-set persist loses cleanly to a concurrent user cancel:
/// the loser sees `InvalidState`, the seats are released exactly once.
pub struct ExpireReservationHandler {
    ledger: Arc<dyn ReservationLedger>,
    params: Arc<dyn SystemParameters>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl ExpireReservationHandler {
    pub fn new(
        ledger: Arc<dyn ReservationLedger>,
        params: Arc<dyn SystemParameters>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            params,
            events,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: ExpireReservationCommand,
    ) -> Result<Reservation, ReservationError> {
        let mut reservation = self
            .ledger
            .find_by_id(cmd.reservation_id)
            .await?
            .ok_or(ReservationError::NotFound(cmd.reservation_id))?;

        let policy = self
            .params
            .get()
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

        let now = self.clock.now();
        reservation.expire(now, policy.pending_timeout_minutes)?;

        self.ledger
            .update_if_status(&reservation, ReservationStatus::Pending)
            .await?;

        let event = ReservationExpired {
            event_id: EventId::new(),
            reservation_id: reservation.id(),
            occurred_at: now,
        };
        self.events
            .publish(event.to_envelope())
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

        Ok(reservation)
    }
}
