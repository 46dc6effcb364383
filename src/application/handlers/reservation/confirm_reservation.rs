//! ConfirmReservationHandler - PENDING to CONFIRMED on payment approval.

use std::sync::Arc;

use crate::domain::foundation::{Clock, EventId, ReservationId, SerializableDomainEvent};
use crate::domain::reservation::{
    Reservation, ReservationConfirmed, ReservationError, ReservationStatus,
};
use crate::ports::{EventPublisher, ReservationLedger};

/// Command to confirm a reservation.
#[derive(Debug, Clone)]
pub struct ConfirmReservationCommand {
    pub reservation_id: ReservationId,
}

/// Handler for confirming reservations.
///
/// Idempotent: confirming an already-confirmed reservation is a no-op
/// success and publishes nothing, which is what webhook redelivery needs.
pub struct ConfirmReservationHandler {
    ledger: Arc<dyn ReservationLedger>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl ConfirmReservationHandler {
    pub fn new(
        ledger: Arc<dyn ReservationLedger>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            events,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmReservationCommand,
    ) -> Result<Reservation, ReservationError> {
        let mut reservation = self
            .ledger
            .find_by_id(cmd.reservation_id)
            .await?
            .ok_or(ReservationError::NotFound(cmd.reservation_id))?;

        let newly_confirmed = reservation.confirm()?;
        if !newly_confirmed {
            return Ok(reservation);
        }

        self.ledger
            .update_if_status(&reservation, ReservationStatus::Pending)
            .await?;

        let event = ReservationConfirmed {
            event_id: EventId::new(),
            reservation_id: reservation.id(),
            occurred_at: self.clock.now(),
        };
        self.events
            .publish(event.to_envelope())
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventPublisher;
    use crate::adapters::memory::InMemoryReservationLedger;
    use crate::domain::catalog::SeatLabel;
    use crate::domain::foundation::{Dni, RoomId, ShowtimeId, SystemClock, Timestamp};
    use std::collections::BTreeSet;

    async fn pending_reservation(ledger: &InMemoryReservationLedger) -> Reservation {
        let seats: BTreeSet<SeatLabel> = ["A1".parse().unwrap()].into();
        let r = Reservation::new(
            RoomId::new(),
            ShowtimeId::new(),
            Dni::new("12345678").unwrap(),
            seats,
            5000,
            Timestamp::now(),
        )
        .unwrap();
        ledger.create_pending(&r, Timestamp::now(), 15).await.unwrap();
        r
    }

    fn handler(
        ledger: Arc<InMemoryReservationLedger>,
        events: Arc<InMemoryEventPublisher>,
    ) -> ConfirmReservationHandler {
        ConfirmReservationHandler::new(ledger, events, Arc::new(SystemClock::new()))
    }

    #[tokio::test]
    async fn confirms_pending_reservation() {
        let ledger = Arc::new(InMemoryReservationLedger::new());
        let events = Arc::new(InMemoryEventPublisher::new());
        let r = pending_reservation(&ledger).await;

        let handler = handler(ledger.clone(), events.clone());
        let confirmed = handler
            .handle(ConfirmReservationCommand { reservation_id: r.id() })
            .await
            .unwrap();

        assert_eq!(confirmed.status(), ReservationStatus::Confirmed);
        assert_eq!(
            ledger.find_by_id(r.id()).await.unwrap().unwrap().status(),
            ReservationStatus::Confirmed
        );
        assert_eq!(events.published().len(), 1);
    }

    #[tokio::test]
    async fn second_confirm_is_noop_success_without_event() {
        let ledger = Arc::new(InMemoryReservationLedger::new());
        let events = Arc::new(InMemoryEventPublisher::new());
        let r = pending_reservation(&ledger).await;
        let handler = handler(ledger, events.clone());

        let cmd = ConfirmReservationCommand { reservation_id: r.id() };
        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(first.status(), ReservationStatus::Confirmed);
        assert_eq!(second.status(), ReservationStatus::Confirmed);
        assert_eq!(events.published().len(), 1);
    }

    #[tokio::test]
    async fn confirm_of_expired_reservation_fails() {
        let ledger = Arc::new(InMemoryReservationLedger::new());
        let events = Arc::new(InMemoryEventPublisher::new());
        let mut r = pending_reservation(&ledger).await;
        r.expire(r.created_at().plus_minutes(20), 15).unwrap();
        ledger
            .update_if_status(&r, ReservationStatus::Pending)
            .await
            .unwrap();

        let handler = handler(ledger, events);
        let result = handler
            .handle(ConfirmReservationCommand { reservation_id: r.id() })
            .await;
        assert!(matches!(result, Err(ReservationError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn unknown_reservation_fails_not_found() {
        let handler = handler(
            Arc::new(InMemoryReservationLedger::new()),
            Arc::new(InMemoryEventPublisher::new()),
        );
        let result = handler
            .handle(ConfirmReservationCommand {
                reservation_id: ReservationId::new(),
            })
            .await;
        assert!(matches!(result, Err(ReservationError::NotFound(_))));
    }
}
