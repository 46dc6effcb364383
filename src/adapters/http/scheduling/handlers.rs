//! HTTP handlers for showtime registry endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::reservation::ListAvailableSeatsQuery;
use crate::application::handlers::scheduling::{CancelShowtimeCommand, ScheduleShowtimeCommand};
use crate::domain::foundation::{MovieId, RoomId, ShowtimeId, Timestamp};

use super::super::auth::AuthenticatedActor;
use super::super::catalog::dto::SeatResponse;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{AvailableSeatsResponse, ScheduleShowtimeRequest, ShowtimeResponse};

/// POST /api/showtimes - schedule a showtime (admin)
pub async fn schedule_showtime(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Json(request): Json<ScheduleShowtimeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    actor.require_admin("schedule showtimes")?;

    let cmd = ScheduleShowtimeCommand {
        room_id: RoomId::from_uuid(request.room_id),
        movie_id: MovieId::from_uuid(request.movie_id),
        starts_at: Timestamp::from_datetime(request.starts_at),
        duration_minutes: request.duration_minutes,
    };

    let showtime = state.schedule_showtime_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(ShowtimeResponse::from(&showtime))))
}

/// GET /api/showtimes - list all showtimes
pub async fn list_showtimes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let showtimes = state.showtimes.list().await?;
    let response: Vec<ShowtimeResponse> = showtimes.iter().map(ShowtimeResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/showtimes/:id/seats - availability for a showtime
///
/// Overdue PENDING holds already count as free here, before the sweeper runs.
pub async fn get_available_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let showtime_id = ShowtimeId::from_uuid(id);
    let seats = state
        .list_available_seats_handler()
        .handle(ListAvailableSeatsQuery { showtime_id })
        .await?;

    let response = AvailableSeatsResponse {
        showtime_id: showtime_id.to_string(),
        available: seats.into_iter().map(SeatResponse::from).collect(),
    };
    Ok(Json(response))
}

/// DELETE /api/showtimes/:id - cancel a showtime without active reservations (admin)
pub async fn cancel_showtime(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    actor.require_admin("cancel showtimes")?;

    let cmd = CancelShowtimeCommand {
        showtime_id: ShowtimeId::from_uuid(id),
    };
    state.cancel_showtime_handler().handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}
