//! PostgreSQL implementation of ShowtimeRepository.
//!
//! The unique (room_id, starts_at) key is enforced by the
//! `showtimes_room_id_starts_at_key` constraint; the overlap rule itself is
//! checked by the scheduling handler before insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{MovieId, RoomId, ShowtimeId, Timestamp};
use crate::domain::scheduling::{ScheduleError, Showtime};
use crate::ports::ShowtimeRepository;

pub struct PostgresShowtimeRepository {
    pool: PgPool,
}

impl PostgresShowtimeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ShowtimeRow {
    id: Uuid,
    room_id: Uuid,
    movie_id: Uuid,
    starts_at: DateTime<Utc>,
    duration_minutes: i32,
}

impl From<ShowtimeRow> for Showtime {
    fn from(row: ShowtimeRow) -> Self {
        Showtime::from_parts(
            ShowtimeId::from_uuid(row.id),
            RoomId::from_uuid(row.room_id),
            MovieId::from_uuid(row.movie_id),
            Timestamp::from_datetime(row.starts_at),
            row.duration_minutes as u32,
        )
    }
}

const SELECT_COLUMNS: &str = "id, room_id, movie_id, starts_at, duration_minutes";

#[async_trait]
impl ShowtimeRepository for PostgresShowtimeRepository {
    async fn save(&self, showtime: &Showtime) -> Result<(), ScheduleError> {
        sqlx::query(
            r#"
            INSERT INTO showtimes (id, room_id, movie_id, starts_at, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(showtime.id().as_uuid())
        .bind(showtime.room_id().as_uuid())
        .bind(showtime.movie_id().as_uuid())
        .bind(showtime.starts_at().as_datetime())
        .bind(showtime.duration_minutes() as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("showtimes_room_id_starts_at_key") {
                    return ScheduleError::already_scheduled(showtime.room_id());
                }
                if db_err.constraint() == Some("showtimes_room_id_fkey") {
                    return ScheduleError::room_not_found(showtime.room_id());
                }
            }
            ScheduleError::infrastructure(format!("failed to save showtime: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: ShowtimeId) -> Result<Option<Showtime>, ScheduleError> {
        let row: Option<ShowtimeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM showtimes WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ScheduleError::infrastructure(format!("failed to find showtime: {}", e)))?;

        Ok(row.map(Showtime::from))
    }

    async fn find_by_room(&self, room_id: RoomId) -> Result<Vec<Showtime>, ScheduleError> {
        let rows: Vec<ShowtimeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM showtimes WHERE room_id = $1 ORDER BY starts_at ASC",
            SELECT_COLUMNS
        ))
        .bind(room_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScheduleError::infrastructure(format!("failed to list showtimes: {}", e)))?;

        Ok(rows.into_iter().map(Showtime::from).collect())
    }

    async fn list(&self) -> Result<Vec<Showtime>, ScheduleError> {
        let rows: Vec<ShowtimeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM showtimes ORDER BY starts_at ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScheduleError::infrastructure(format!("failed to list showtimes: {}", e)))?;

        Ok(rows.into_iter().map(Showtime::from).collect())
    }

    async fn delete(&self, id: ShowtimeId) -> Result<(), ScheduleError> {
        let result = sqlx::query("DELETE FROM showtimes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                ScheduleError::infrastructure(format!("failed to delete showtime: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(ScheduleError::NotFound(id));
        }
        Ok(())
    }

    async fn count_for_room(&self, room_id: RoomId) -> Result<u64, ScheduleError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM showtimes WHERE room_id = $1")
            .bind(room_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                ScheduleError::infrastructure(format!("failed to count showtimes: {}", e))
            })?;

        Ok(count as u64)
    }
}
