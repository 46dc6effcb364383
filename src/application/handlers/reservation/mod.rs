//! Reservation ledger handlers.

mod cancel_reservation;
mod confirm_reservation;
mod create_reservation;
mod expire_reservation;
mod handle_payment_webhook;
mod list_available_seats;

pub use cancel_reservation::{CancelReservationCommand, CancelReservationHandler};
pub use confirm_reservation::{ConfirmReservationCommand, ConfirmReservationHandler};
pub use create_reservation::{
    CreateReservationCommand, CreateReservationHandler, CreateReservationResult,
};
pub use expire_reservation::{ExpireReservationCommand, ExpireReservationHandler};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookOutcome,
};
pub use list_available_seats::{ListAvailableSeatsHandler, ListAvailableSeatsQuery};
