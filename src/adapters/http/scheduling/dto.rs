//! JSON request/response types for the showtime registry endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::scheduling::Showtime;

use super::super::catalog::dto::SeatResponse;

/// Request to schedule a showtime.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleShowtimeRequest {
    pub room_id: uuid::Uuid,
    pub movie_id: uuid::Uuid,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
}

/// Showtime details.
#[derive(Debug, Clone, Serialize)]
pub struct ShowtimeResponse {
    pub id: String,
    pub room_id: String,
    pub movie_id: String,
    pub starts_at: String,
    pub duration_minutes: u32,
}

impl From<&Showtime> for ShowtimeResponse {
    fn from(showtime: &Showtime) -> Self {
        Self {
            id: showtime.id().to_string(),
            room_id: showtime.room_id().to_string(),
            movie_id: showtime.movie_id().to_string(),
            starts_at: showtime.starts_at().as_datetime().to_rfc3339(),
            duration_minutes: showtime.duration_minutes(),
        }
    }
}

/// Seats currently free for a showtime.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableSeatsResponse {
    pub showtime_id: String,
    pub available: Vec<SeatResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_request_parses_rfc3339_start() {
        let json = r#"{
            "room_id": "550e8400-e29b-41d4-a716-446655440000",
            "movie_id": "550e8400-e29b-41d4-a716-446655440001",
            "starts_at": "2026-03-01T20:00:00Z",
            "duration_minutes": 120
        }"#;
        let request: ScheduleShowtimeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.duration_minutes, 120);
        assert_eq!(request.starts_at.to_rfc3339(), "2026-03-01T20:00:00+00:00");
    }
}
