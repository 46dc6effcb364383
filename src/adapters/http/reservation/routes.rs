//! Axum routers for reservation endpoints and the payment webhook.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    cancel_reservation, create_reservation, delete_reservation, get_reservation,
    handle_mercadopago_webhook, list_reservations,
};

/// Reservation ledger routes, mounted at `/api/reservations`.
///
/// The per-reservation path is the natural key: room, showtime, DNI and
/// the RFC 3339 creation timestamp.
///
/// - `POST /` - create a PENDING reservation and start checkout
/// - `GET /` - list reservations (404 when none exist)
/// - `GET /:room_id/:showtime_id/:dni/:created_at` - lookup
/// - `PUT /:room_id/:showtime_id/:dni/:created_at` - cancel
/// - `DELETE /:room_id/:showtime_id/:dni/:created_at` - hard delete (admin)
pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_reservation).get(list_reservations))
        .route(
            "/:room_id/:showtime_id/:dni/:created_at",
            get(get_reservation)
                .put(cancel_reservation)
                .delete(delete_reservation),
        )
}

/// Webhook routes, mounted at `/api/webhooks`.
///
/// - `POST /mercadopago` - signed payment result delivery
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/mercadopago", post(handle_mercadopago_webhook))
}
