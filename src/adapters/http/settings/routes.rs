//! Axum router for the booking policy endpoints.

use axum::{routing::get, Router};

use super::super::state::AppState;
use super::handlers::{get_settings, update_settings};

/// Settings routes, mounted at `/api/settings`.
///
/// - `GET /` - current booking policy (admin)
/// - `PUT /` - replace the booking policy (admin)
pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}
