//! JSON request/response types for the room catalog endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Room, Seat};

/// Request to create a room.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub location: String,
    pub rows: u16,
    pub seats_per_row: u16,
    /// Seat labels like "A1"; defaults to no VIP seats.
    #[serde(default)]
    pub vip_seats: Vec<String>,
}

/// Room details.
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub location: String,
    pub rows: u16,
    pub seats_per_row: u16,
    pub capacity: u32,
    pub vip_seats: Vec<String>,
    pub created_at: String,
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id().to_string(),
            name: room.name().to_string(),
            location: room.location().to_string(),
            rows: room.rows(),
            seats_per_row: room.seats_per_row(),
            capacity: room.capacity(),
            vip_seats: room.vip_seats().iter().map(|s| s.to_string()).collect(),
            created_at: room.created_at().as_datetime().to_rfc3339(),
        }
    }
}

/// One seat in a room's catalog.
#[derive(Debug, Clone, Serialize)]
pub struct SeatResponse {
    pub label: String,
    pub is_vip: bool,
}

impl From<Seat> for SeatResponse {
    fn from(seat: Seat) -> Self {
        Self {
            label: seat.label.to_string(),
            is_vip: seat.is_vip,
        }
    }
}

/// A room's full ordered seat catalog.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSeatsResponse {
    pub room_id: String,
    pub seats: Vec<SeatResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use std::collections::BTreeSet;

    #[test]
    fn create_room_request_defaults_vip_to_empty() {
        let json = r#"{"name": "A1", "location": "Planta baja", "rows": 5, "seats_per_row": 6}"#;
        let request: CreateRoomRequest = serde_json::from_str(json).unwrap();
        assert!(request.vip_seats.is_empty());
    }

    #[test]
    fn room_response_reflects_geometry() {
        let vip: BTreeSet<_> = ["C3".parse().unwrap()].into();
        let room = Room::new("A1", "Planta baja", 5, 6, vip, Timestamp::now()).unwrap();

        let response = RoomResponse::from(&room);
        assert_eq!(response.capacity, 30);
        assert_eq!(response.vip_seats, vec!["C3".to_string()]);
    }
}
