//! HTTP handlers for room catalog endpoints.

use std::collections::BTreeSet;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::catalog::{CreateRoomCommand, DeleteRoomCommand};
use crate::domain::catalog::{CatalogError, SeatLabel};
use crate::domain::foundation::RoomId;

use super::super::auth::AuthenticatedActor;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{CreateRoomRequest, RoomResponse, RoomSeatsResponse, SeatResponse};

/// POST /api/rooms - create a room (admin)
pub async fn create_room(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Json(request): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    actor.require_admin("create rooms")?;

    let vip_seats = parse_seat_labels(&request.vip_seats)?;
    let cmd = CreateRoomCommand {
        name: request.name,
        location: request.location,
        rows: request.rows,
        seats_per_row: request.seats_per_row,
        vip_seats,
    };

    let room = state.create_room_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(RoomResponse::from(&room))))
}

/// GET /api/rooms - list all rooms
pub async fn list_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rooms = state.rooms.list().await?;
    let response: Vec<RoomResponse> = rooms.iter().map(RoomResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/rooms/:id/seats - a room's full seat catalog with VIP flags
pub async fn get_room_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let room_id = RoomId::from_uuid(id);
    let room = state
        .rooms
        .find_by_id(room_id)
        .await?
        .ok_or(CatalogError::NotFound(room_id))?;

    let response = RoomSeatsResponse {
        room_id: room.id().to_string(),
        seats: room.seats().into_iter().map(SeatResponse::from).collect(),
    };
    Ok(Json(response))
}

/// DELETE /api/rooms/:id - delete a room without showtimes (admin)
pub async fn delete_room(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    actor.require_admin("delete rooms")?;

    let cmd = DeleteRoomCommand {
        room_id: RoomId::from_uuid(id),
    };
    state.delete_room_handler().handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_seat_labels(labels: &[String]) -> Result<BTreeSet<SeatLabel>, ApiError> {
    labels
        .iter()
        .map(|s| {
            s.parse::<SeatLabel>()
                .map_err(|e| ApiError::validation("vip_seats", e.to_string()))
        })
        .collect()
}
