//! In-memory showtime repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{RoomId, ShowtimeId};
use crate::domain::scheduling::{ScheduleError, Showtime};
use crate::ports::ShowtimeRepository;

#[derive(Default)]
pub struct InMemoryShowtimeRepository {
    showtimes: Mutex<HashMap<ShowtimeId, Showtime>>,
}

impl InMemoryShowtimeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShowtimeRepository for InMemoryShowtimeRepository {
    async fn save(&self, showtime: &Showtime) -> Result<(), ScheduleError> {
        let mut showtimes = self.showtimes.lock().unwrap_or_else(|e| e.into_inner());
        let collision = showtimes.values().any(|s| {
            s.room_id() == showtime.room_id() && s.starts_at() == showtime.starts_at()
        });
        if collision {
            return Err(ScheduleError::already_scheduled(showtime.room_id()));
        }
        showtimes.insert(showtime.id(), showtime.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ShowtimeId) -> Result<Option<Showtime>, ScheduleError> {
        let showtimes = self.showtimes.lock().unwrap_or_else(|e| e.into_inner());
        Ok(showtimes.get(&id).cloned())
    }

    async fn find_by_room(&self, room_id: RoomId) -> Result<Vec<Showtime>, ScheduleError> {
        let showtimes = self.showtimes.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Showtime> = showtimes
            .values()
            .filter(|s| s.room_id() == room_id)
            .cloned()
            .collect();
        out.sort_by_key(|s| s.starts_at());
        Ok(out)
    }

    async fn list(&self) -> Result<Vec<Showtime>, ScheduleError> {
        let showtimes = self.showtimes.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Showtime> = showtimes.values().cloned().collect();
        out.sort_by_key(|s| s.starts_at());
        Ok(out)
    }

    async fn delete(&self, id: ShowtimeId) -> Result<(), ScheduleError> {
        let mut showtimes = self.showtimes.lock().unwrap_or_else(|e| e.into_inner());
        showtimes
            .remove(&id)
            .map(|_| ())
            .ok_or(ScheduleError::NotFound(id))
    }

    async fn count_for_room(&self, room_id: RoomId) -> Result<u64, ScheduleError> {
        let showtimes = self.showtimes.lock().unwrap_or_else(|e| e.into_inner());
        Ok(showtimes.values().filter(|s| s.room_id() == room_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{MovieId, Timestamp};
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    fn showtime(room: RoomId, start: &str) -> Showtime {
        Showtime::new(room, MovieId::new(), ts(start), 120).unwrap()
    }

    #[tokio::test]
    async fn rejects_duplicate_room_and_start() {
        let repo = InMemoryShowtimeRepository::new();
        let room = RoomId::new();
        repo.save(&showtime(room, "2026-03-01T20:00:00Z")).await.unwrap();

        let result = repo.save(&showtime(room, "2026-03-01T20:00:00Z")).await;
        assert!(matches!(result, Err(ScheduleError::AlreadyScheduled { .. })));
    }

    #[tokio::test]
    async fn find_by_room_is_ordered_by_start() {
        let repo = InMemoryShowtimeRepository::new();
        let room = RoomId::new();
        repo.save(&showtime(room, "2026-03-01T22:00:00Z")).await.unwrap();
        repo.save(&showtime(room, "2026-03-01T18:00:00Z")).await.unwrap();
        repo.save(&showtime(RoomId::new(), "2026-03-01T19:00:00Z")).await.unwrap();

        let in_room = repo.find_by_room(room).await.unwrap();
        assert_eq!(in_room.len(), 2);
        assert!(in_room[0].starts_at() < in_room[1].starts_at());
    }

    #[tokio::test]
    async fn count_for_room_counts_only_that_room() {
        let repo = InMemoryShowtimeRepository::new();
        let room = RoomId::new();
        repo.save(&showtime(room, "2026-03-01T18:00:00Z")).await.unwrap();
        repo.save(&showtime(RoomId::new(), "2026-03-01T18:00:00Z")).await.unwrap();

        assert_eq!(repo.count_for_room(room).await.unwrap(), 1);
    }
}
