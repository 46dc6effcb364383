//! Showtime aggregate and the per-room overlap rule.

use serde::{Deserialize, Serialize};

use super::errors::ScheduleError;
use crate::domain::foundation::{MovieId, RoomId, ShowtimeId, Timestamp};

/// Longest screening the registry accepts, in minutes (8 hours).
const MAX_DURATION_MINUTES: u32 = 480;

/// A movie scheduled into a room at a start time.
///
/// The natural key is (room_id, starts_at); the surrogate id exists for
/// foreign-key references from reservations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showtime {
    id: ShowtimeId,
    room_id: RoomId,
    movie_id: MovieId,
    starts_at: Timestamp,
    duration_minutes: u32,
}

impl Showtime {
    /// Creates a showtime, validating the duration.
    pub fn new(
        room_id: RoomId,
        movie_id: MovieId,
        starts_at: Timestamp,
        duration_minutes: u32,
    ) -> Result<Self, ScheduleError> {
        if duration_minutes == 0 || duration_minutes > MAX_DURATION_MINUTES {
            return Err(ScheduleError::validation(
                "duration_minutes",
                format!(
                    "must be between 1 and {}, got {}",
                    MAX_DURATION_MINUTES, duration_minutes
                ),
            ));
        }
        Ok(Self {
            id: ShowtimeId::new(),
            room_id,
            movie_id,
            starts_at,
            duration_minutes,
        })
    }

    /// Reconstructs a showtime from persisted state without validation.
    pub fn from_parts(
        id: ShowtimeId,
        room_id: RoomId,
        movie_id: MovieId,
        starts_at: Timestamp,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id,
            room_id,
            movie_id,
            starts_at,
            duration_minutes,
        }
    }

    /// The slot this showtime occupies including cleanup time, as a
    /// half-open interval [start, start + duration + buffer).
    pub fn occupied_until(&self, cleanup_buffer_minutes: i64) -> Timestamp {
        self.starts_at
            .plus_minutes(self.duration_minutes as i64 + cleanup_buffer_minutes)
    }

    /// Checks whether this showtime's slot intersects another's in the same
    /// room. Intervals are half-open, so back-to-back scheduling exactly at
    /// the buffer boundary is allowed.
    pub fn conflicts_with(&self, other: &Showtime, cleanup_buffer_minutes: i64) -> bool {
        if self.room_id != other.room_id {
            return false;
        }
        self.starts_at < other.occupied_until(cleanup_buffer_minutes)
            && other.starts_at < self.occupied_until(cleanup_buffer_minutes)
    }

    /// True once the screening has started.
    pub fn has_started(&self, now: Timestamp) -> bool {
        now >= self.starts_at
    }

    pub fn id(&self) -> ShowtimeId {
        self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    pub fn starts_at(&self) -> Timestamp {
        self.starts_at
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    fn showtime_at(room_id: RoomId, start: &str, duration: u32) -> Showtime {
        Showtime::new(room_id, MovieId::new(), ts(start), duration).unwrap()
    }

    #[test]
    fn showtime_rejects_zero_duration() {
        let result = Showtime::new(RoomId::new(), MovieId::new(), Timestamp::now(), 0);
        assert!(matches!(result, Err(ScheduleError::ValidationFailed { .. })));
    }

    #[test]
    fn occupied_until_includes_cleanup_buffer() {
        let st = showtime_at(RoomId::new(), "2026-03-01T10:00:00Z", 120);
        assert_eq!(st.occupied_until(10), ts("2026-03-01T12:10:00Z"));
    }

    #[test]
    fn overlapping_slots_conflict() {
        let room = RoomId::new();
        // Occupies [10:00, 12:10) with a 10-minute buffer.
        let first = showtime_at(room, "2026-03-01T10:00:00Z", 120);
        let second = showtime_at(room, "2026-03-01T12:00:00Z", 120);

        assert!(first.conflicts_with(&second, 10));
        assert!(second.conflicts_with(&first, 10));
    }

    #[test]
    fn back_to_back_at_buffer_boundary_is_allowed() {
        let room = RoomId::new();
        let first = showtime_at(room, "2026-03-01T10:00:00Z", 120);
        let second = showtime_at(room, "2026-03-01T12:10:00Z", 110);

        assert!(!first.conflicts_with(&second, 10));
        assert!(!second.conflicts_with(&first, 10));
    }

    #[test]
    fn different_rooms_never_conflict() {
        let first = showtime_at(RoomId::new(), "2026-03-01T10:00:00Z", 120);
        let second = showtime_at(RoomId::new(), "2026-03-01T10:00:00Z", 120);

        assert!(!first.conflicts_with(&second, 10));
    }

    #[test]
    fn earlier_showtime_swallowed_by_longer_one_conflicts() {
        let room = RoomId::new();
        let long = showtime_at(room, "2026-03-01T10:00:00Z", 240);
        let inner = showtime_at(room, "2026-03-01T11:00:00Z", 60);

        assert!(long.conflicts_with(&inner, 0));
        assert!(inner.conflicts_with(&long, 0));
    }

    #[test]
    fn has_started_compares_against_now() {
        let st = showtime_at(RoomId::new(), "2026-03-01T20:00:00Z", 120);
        assert!(!st.has_started(ts("2026-03-01T19:59:59Z")));
        assert!(st.has_started(ts("2026-03-01T20:00:00Z")));
    }
}
