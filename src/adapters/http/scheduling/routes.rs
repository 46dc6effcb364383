//! Axum router for showtime registry endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{cancel_showtime, get_available_seats, list_showtimes, schedule_showtime};

/// Showtime registry routes, mounted at `/api/showtimes`.
///
/// - `POST /` - schedule a showtime (admin)
/// - `GET /` - list showtimes
/// - `GET /:id/seats` - seat availability
/// - `DELETE /:id` - cancel a showtime (admin)
pub fn showtime_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(schedule_showtime).get(list_showtimes))
        .route("/:id/seats", get(get_available_seats))
        .route("/:id", delete(cancel_showtime))
}
