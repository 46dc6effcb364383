//! HTTP handlers for the admin-editable booking policy.

use axum::extract::{Json, State};
use axum::response::IntoResponse;
use tracing::info;

use crate::ports::BookingPolicy;

use super::super::auth::AuthenticatedActor;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{SettingsResponse, UpdateSettingsRequest};

/// GET /api/settings - current booking policy (admin)
pub async fn get_settings(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
) -> Result<impl IntoResponse, ApiError> {
    actor.require_admin("read settings")?;

    let policy = state.params.get().await?;
    Ok(Json(SettingsResponse::from(policy)))
}

/// PUT /api/settings - replace the booking policy (admin)
///
/// Takes effect on the next read; running handlers and the sweeper pick
/// it up without a restart.
pub async fn update_settings(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    actor.require_admin("update settings")?;

    let policy = BookingPolicy::from(request);
    policy.validate()?;
    state.params.update(policy).await?;
    info!(
        cleanup_buffer_minutes = policy.cleanup_buffer_minutes,
        pending_timeout_minutes = policy.pending_timeout_minutes,
        cancellation_cutoff_minutes = policy.cancellation_cutoff_minutes,
        min_lead_time_minutes = policy.min_lead_time_minutes,
        "booking policy updated"
    );
    Ok(Json(SettingsResponse::from(policy)))
}
