//! Showtime repository port.

use async_trait::async_trait;

use crate::domain::foundation::{RoomId, ShowtimeId};
use crate::domain::scheduling::{ScheduleError, Showtime};

/// Repository port for Showtime aggregate persistence.
///
/// Implementations must enforce the unique (room_id, starts_at) natural key;
/// the overlap rule itself lives in the scheduling handler, which reads the
/// room's existing showtimes before inserting.
#[async_trait]
pub trait ShowtimeRepository: Send + Sync {
    /// Save a new showtime.
    ///
    /// # Errors
    ///
    /// - `AlreadyScheduled` on a (room, starts_at) natural-key collision
    async fn save(&self, showtime: &Showtime) -> Result<(), ScheduleError>;

    /// Find a showtime by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: ShowtimeId) -> Result<Option<Showtime>, ScheduleError>;

    /// All showtimes scheduled in a room, ordered by start time.
    async fn find_by_room(&self, room_id: RoomId) -> Result<Vec<Showtime>, ScheduleError>;

    /// List all showtimes, ordered by start time.
    async fn list(&self) -> Result<Vec<Showtime>, ScheduleError>;

    /// Delete a showtime.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the showtime doesn't exist
    async fn delete(&self, id: ShowtimeId) -> Result<(), ScheduleError>;

    /// Count showtimes referencing a room. Guards room deletion.
    async fn count_for_room(&self, room_id: RoomId) -> Result<u64, ScheduleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showtime_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ShowtimeRepository) {}
    }
}
