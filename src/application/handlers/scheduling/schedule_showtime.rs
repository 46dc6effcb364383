//! ScheduleShowtimeHandler - admin command to schedule a movie into a room.

use std::sync::Arc;

use crate::domain::foundation::{MovieId, RoomId, Timestamp};
use crate::domain::scheduling::{ScheduleError, Showtime};
use crate::ports::{RoomRepository, ShowtimeRepository, SystemParameters};

/// Command to schedule a showtime.
#[derive(Debug, Clone)]
pub struct ScheduleShowtimeCommand {
    pub room_id: RoomId,
    pub movie_id: MovieId,
    pub starts_at: Timestamp,
    pub duration_minutes: u32,
}

/// Handler for scheduling showtimes.
///
/// Reads the cleanup buffer from system parameters on every call, so admin
/// edits apply immediately. The overlap check runs against all showtimes in
/// the room; the repository's (room, starts_at) unique constraint backstops
/// exact-start races.
pub struct ScheduleShowtimeHandler {
    rooms: Arc<dyn RoomRepository>,
    showtimes: Arc<dyn ShowtimeRepository>,
    params: Arc<dyn SystemParameters>,
}

impl ScheduleShowtimeHandler {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        showtimes: Arc<dyn ShowtimeRepository>,
        params: Arc<dyn SystemParameters>,
    ) -> Self {
        Self {
            rooms,
            showtimes,
            params,
        }
    }

    pub async fn handle(&self, cmd: ScheduleShowtimeCommand) -> Result<Showtime, ScheduleError> {
        self.rooms
            .find_by_id(cmd.room_id)
            .await
            .map_err(|e| ScheduleError::infrastructure(e.to_string()))?
            .ok_or(ScheduleError::RoomNotFound(cmd.room_id))?;

        let showtime = Showtime::new(cmd.room_id, cmd.movie_id, cmd.starts_at, cmd.duration_minutes)?;

        let policy = self
            .params
            .get()
            .await
            .map_err(|e| ScheduleError::infrastructure(e.to_string()))?;

        let existing = self.showtimes.find_by_room(cmd.room_id).await?;
        if let Some(conflict) = existing
            .iter()
            .find(|s| s.conflicts_with(&showtime, policy.cleanup_buffer_minutes))
        {
            return Err(ScheduleError::overlap_conflict(cmd.room_id, conflict.id()));
        }

        self.showtimes.save(&showtime).await?;
        Ok(showtime)
    }
}
