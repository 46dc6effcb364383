//! Shared application state for the HTTP surface.

use std::sync::Arc;

use crate::adapters::mercadopago::WebhookVerifier;
use crate::application::handlers::catalog::{CreateRoomHandler, DeleteRoomHandler};
use crate::application::handlers::reservation::{
    CancelReservationHandler, CreateReservationHandler, HandlePaymentWebhookHandler,
    ListAvailableSeatsHandler,
};
use crate::application::handlers::scheduling::{CancelShowtimeHandler, ScheduleShowtimeHandler};
use crate::domain::foundation::Clock;
use crate::ports::{
    EventPublisher, PaymentGateway, ReservationLedger, RoomRepository, ShowtimeRepository,
    SystemParameters,
};

/// Arc-wrapped dependencies, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<dyn RoomRepository>,
    pub showtimes: Arc<dyn ShowtimeRepository>,
    pub ledger: Arc<dyn ReservationLedger>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub params: Arc<dyn SystemParameters>,
    pub events: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
    pub webhook_verifier: Arc<WebhookVerifier>,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn create_room_handler(&self) -> CreateRoomHandler {
        CreateRoomHandler::new(self.rooms.clone(), self.clock.clone())
    }

    pub fn delete_room_handler(&self) -> DeleteRoomHandler {
        DeleteRoomHandler::new(self.rooms.clone(), self.showtimes.clone())
    }

    pub fn schedule_showtime_handler(&self) -> ScheduleShowtimeHandler {
        ScheduleShowtimeHandler::new(
            self.rooms.clone(),
            self.showtimes.clone(),
            self.params.clone(),
        )
    }

    pub fn cancel_showtime_handler(&self) -> CancelShowtimeHandler {
        CancelShowtimeHandler::new(self.showtimes.clone(), self.ledger.clone())
    }

    pub fn create_reservation_handler(&self) -> CreateReservationHandler {
        CreateReservationHandler::new(
            self.rooms.clone(),
            self.showtimes.clone(),
            self.ledger.clone(),
            self.gateway.clone(),
            self.params.clone(),
            self.events.clone(),
            self.clock.clone(),
        )
    }

    pub fn cancel_reservation_handler(&self) -> CancelReservationHandler {
        CancelReservationHandler::new(
            self.ledger.clone(),
            self.showtimes.clone(),
            self.params.clone(),
            self.events.clone(),
            self.clock.clone(),
        )
    }

    pub fn list_available_seats_handler(&self) -> ListAvailableSeatsHandler {
        ListAvailableSeatsHandler::new(
            self.rooms.clone(),
            self.showtimes.clone(),
            self.ledger.clone(),
            self.params.clone(),
            self.clock.clone(),
        )
    }

    pub fn payment_webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.gateway.clone(),
            self.ledger.clone(),
            self.showtimes.clone(),
            self.params.clone(),
            self.events.clone(),
            self.clock.clone(),
        )
    }
}
