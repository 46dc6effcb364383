//! Axum router for room catalog endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{create_room, delete_room, get_room_seats, list_rooms};

/// Room catalog routes, mounted at `/api/rooms`.
///
/// - `POST /` - create a room (admin)
/// - `GET /` - list rooms
/// - `GET /:id/seats` - full seat catalog with VIP flags
/// - `DELETE /:id` - delete a room without showtimes (admin)
pub fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_room).get(list_rooms))
        .route("/:id/seats", get(get_room_seats))
        .route("/:id", axum::routing::delete(delete_room))
}
