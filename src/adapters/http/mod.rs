//! HTTP adapter - the REST surface over the application handlers.
//!
//! Each resource gets its own module with `dto`, `handlers` and `routes`
//! files; [`api_router`] assembles them under `/api`. Authentication is a
//! role header resolved by [`AuthenticatedActor`]; failures surface as
//! [`ApiError`] with the shared error body shape.

use axum::Router;

mod auth;
mod error;
mod state;

pub mod catalog;
pub mod reservation;
pub mod scheduling;
pub mod settings;

pub use auth::AuthenticatedActor;
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

/// The full REST surface, to be nested at `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/rooms", catalog::room_routes())
        .nest("/showtimes", scheduling::showtime_routes())
        .nest("/reservations", reservation::reservation_routes())
        .nest("/settings", settings::settings_routes())
        .nest("/webhooks", reservation::webhook_routes())
}
