//! PostgreSQL implementation of RoomRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, Room, SeatLabel};
use crate::domain::foundation::{RoomId, Timestamp};
use crate::ports::RoomRepository;

pub struct PostgresRoomRepository {
    pool: PgPool,
}

impl PostgresRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    name: String,
    location: String,
    seat_rows: i16,
    seats_per_row: i16,
    vip_seats: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RoomRow> for Room {
    type Error = CatalogError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let vip_seats: BTreeSet<SeatLabel> = row
            .vip_seats
            .iter()
            .map(|s| {
                s.parse().map_err(|_| {
                    CatalogError::infrastructure(format!("invalid seat label in row: {}", s))
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Room::from_parts(
            RoomId::from_uuid(row.id),
            row.name,
            row.location,
            row.seat_rows as u16,
            row.seats_per_row as u16,
            vip_seats,
            Timestamp::from_datetime(row.created_at),
        ))
    }
}

fn vip_to_strings(room: &Room) -> Vec<String> {
    room.vip_seats().iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    async fn save(&self, room: &Room) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO rooms (id, name, location, seat_rows, seats_per_row, vip_seats, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(room.id().as_uuid())
        .bind(room.name())
        .bind(room.location())
        .bind(room.rows() as i16)
        .bind(room.seats_per_row() as i16)
        .bind(vip_to_strings(room))
        .bind(room.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::infrastructure(format!("failed to save room: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, CatalogError> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
            SELECT id, name, location, seat_rows, seats_per_row, vip_seats, created_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::infrastructure(format!("failed to find room: {}", e)))?;

        row.map(Room::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Room>, CatalogError> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
            SELECT id, name, location, seat_rows, seats_per_row, vip_seats, created_at
            FROM rooms
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::infrastructure(format!("failed to list rooms: {}", e)))?;

        rows.into_iter().map(Room::try_from).collect()
    }

    async fn delete(&self, id: RoomId) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    // Foreign key from showtimes blocks the delete.
                    if db_err.constraint() == Some("showtimes_room_id_fkey") {
                        return CatalogError::RoomInUse(id);
                    }
                }
                CatalogError::infrastructure(format!("failed to delete room: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(id));
        }
        Ok(())
    }
}
