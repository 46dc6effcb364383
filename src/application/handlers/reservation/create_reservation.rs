//! CreateReservationHandler - the atomic check-and-bind entry point.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::domain::catalog::SeatLabel;
use crate::domain::foundation::{
    Clock, Dni, EventId, RoomId, SerializableDomainEvent, ShowtimeId,
};
use crate::domain::reservation::{Reservation, ReservationCreated, ReservationError};
use crate::ports::{
    EventPublisher, PaymentGateway, ReservationLedger, RoomRepository, ShowtimeRepository,
    SystemParameters,
};

/// Command to create a reservation.
#[derive(Debug, Clone)]
pub struct CreateReservationCommand {
    pub room_id: RoomId,
    pub showtime_id: ShowtimeId,
    pub dni: Dni,
    pub seats: BTreeSet<SeatLabel>,
    pub total_cents: i64,
}

/// Result of a successful creation.
#[derive(Debug, Clone)]
pub struct CreateReservationResult {
    pub reservation: Reservation,
    /// Checkout redirect, absent when the gateway call failed. The
    /// reservation stays PENDING either way; the sweeper reclaims it if
    /// payment never starts.
    pub redirect_url: Option<String>,
}

/// Handler for reservation creation.
///
/// Validation order: showtime exists and belongs to the room, lead time,
/// seat geometry, then the ledger's atomic check-and-bind. Losers of a seat
/// race get `SeatsUnavailable` naming the exact conflicting seats.
pub struct CreateReservationHandler {
    rooms: Arc<dyn RoomRepository>,
    showtimes: Arc<dyn ShowtimeRepository>,
    ledger: Arc<dyn ReservationLedger>,
    gateway: Arc<dyn PaymentGateway>,
    params: Arc<dyn SystemParameters>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl CreateReservationHandler {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        showtimes: Arc<dyn ShowtimeRepository>,
        ledger: Arc<dyn ReservationLedger>,
        gateway: Arc<dyn PaymentGateway>,
        params: Arc<dyn SystemParameters>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            showtimes,
            ledger,
            gateway,
            params,
            events,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateReservationCommand,
    ) -> Result<CreateReservationResult, ReservationError> {
        let now = self.clock.now();
        let policy = self
            .params
            .get()
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

        // 1. Showtime must exist, belong to the room, and start far enough away.
        let showtime = self
            .showtimes
            .find_by_id(cmd.showtime_id)
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?
            .filter(|s| s.room_id() == cmd.room_id)
            .ok_or(ReservationError::ShowtimeNotFound(cmd.showtime_id))?;

        let earliest_allowed_start = now.plus_minutes(policy.min_lead_time_minutes);
        if showtime.starts_at() <= earliest_allowed_start {
            return Err(ReservationError::showtime_started(cmd.showtime_id));
        }

        // 2. Every requested seat must exist in the room geometry.
        let room = self
            .rooms
            .find_by_id(cmd.room_id)
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?
            .ok_or(ReservationError::RoomNotFound(cmd.room_id))?;

        let invalid: Vec<SeatLabel> = cmd
            .seats
            .iter()
            .filter(|s| !room.is_valid_seat(s))
            .copied()
            .collect();
        if !invalid.is_empty() {
            return Err(ReservationError::invalid_seats(invalid));
        }

        // 3. Atomic check-and-bind.
        let reservation = Reservation::new(
            cmd.room_id,
            cmd.showtime_id,
            cmd.dni,
            cmd.seats,
            cmd.total_cents,
            now,
        )?;
        self.ledger
            .create_pending(&reservation, now, policy.pending_timeout_minutes)
            .await?;

        // 4. Start the payment flow. A gateway failure leaves the
        //    reservation PENDING without a redirect.
        let redirect_url = match self.gateway.create_preference(&reservation).await {
            Ok(preference) => Some(preference.redirect_url),
            Err(e) => {
                warn!(
                    reservation_id = %reservation.id(),
                    error = %e,
                    "payment preference creation failed; reservation stays pending"
                );
                None
            }
        };

        let event = ReservationCreated {
            event_id: EventId::new(),
            reservation_id: reservation.id(),
            showtime_id: reservation.showtime_id(),
            seats: reservation.seats().iter().copied().collect(),
            total_cents: reservation.total_cents(),
            occurred_at: now,
        };
        self.events
            .publish(event.to_envelope())
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

        Ok(CreateReservationResult {
            reservation,
            redirect_url,
        })
    }
}
