//! PostgreSQL implementation of ReservationLedger.
//!
//! Seat binding is a single transaction serialized per showtime with an
//! advisory lock, so concurrent requests for overlapping seats have exactly
//! one winner. A partial unique index on active holds
//! (`reservation_seats_active_uniq`) backs the same rule at the schema
//! level. Status changes go through a compare-and-set UPDATE; when a
//! reservation leaves an active status its holds are retired in the same
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::catalog::SeatLabel;
use crate::domain::foundation::{Dni, ReservationId, RoomId, ShowtimeId, Timestamp};
use crate::domain::reservation::{
    Reservation, ReservationError, ReservationKey, ReservationStatus,
};
use crate::ports::ReservationLedger;

pub struct PostgresReservationLedger {
    pool: PgPool,
}

impl PostgresReservationLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_showtime(
        tx: &mut Transaction<'_, Postgres>,
        showtime_id: ShowtimeId,
    ) -> Result<(), ReservationError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(showtime_id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(|e| infra("failed to lock showtime", e))?;
        Ok(())
    }
}

fn infra(context: &str, e: sqlx::Error) -> ReservationError {
    ReservationError::infrastructure(format!("{}: {}", context, e))
}

#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    room_id: Uuid,
    showtime_id: Uuid,
    dni: String,
    total_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
    seats: Vec<String>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = ReservationError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status = ReservationStatus::parse_str(&row.status).map_err(|_| {
            ReservationError::infrastructure(format!("invalid status in row: {}", row.status))
        })?;
        let dni = Dni::new(row.dni)
            .map_err(|e| ReservationError::infrastructure(format!("invalid dni in row: {}", e)))?;
        let seats: BTreeSet<SeatLabel> = row
            .seats
            .iter()
            .map(|s| {
                s.parse().map_err(|_| {
                    ReservationError::infrastructure(format!("invalid seat label in row: {}", s))
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Reservation::from_parts(
            ReservationId::from_uuid(row.id),
            RoomId::from_uuid(row.room_id),
            ShowtimeId::from_uuid(row.showtime_id),
            dni,
            seats,
            row.total_cents,
            status,
            Timestamp::from_datetime(row.created_at),
            row.cancelled_at.map(Timestamp::from_datetime),
        ))
    }
}

const SELECT_RESERVATION: &str = r#"
    SELECT r.id, r.room_id, r.showtime_id, r.dni, r.total_cents, r.status,
           r.created_at, r.cancelled_at,
           COALESCE(
               array_agg(rs.seat_label ORDER BY rs.seat_label)
                   FILTER (WHERE rs.seat_label IS NOT NULL),
               '{}'
           ) AS seats
    FROM reservations r
    LEFT JOIN reservation_seats rs ON rs.reservation_id = r.id
"#;

#[async_trait]
impl ReservationLedger for PostgresReservationLedger {
    async fn create_pending(
        &self,
        reservation: &Reservation,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<(), ReservationError> {
        let labels: Vec<String> = reservation.seats().iter().map(|s| s.to_string()).collect();
        let pending_cutoff = now.minus_minutes(pending_timeout_minutes);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| infra("failed to begin transaction", e))?;

        Self::lock_showtime(&mut tx, reservation.showtime_id()).await?;

        // Active holds on the requested seats: CONFIRMED, or PENDING still
        // inside its timeout.
        let conflicts: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT rs.seat_label
            FROM reservation_seats rs
            JOIN reservations r ON r.id = rs.reservation_id
            WHERE rs.showtime_id = $1
              AND rs.seat_label = ANY($2)
              AND (
                    r.status = 'confirmed'
                 OR (r.status = 'pending' AND r.created_at > $3)
              )
            "#,
        )
        .bind(reservation.showtime_id().as_uuid())
        .bind(&labels)
        .bind(pending_cutoff.as_datetime())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| infra("failed to check seat holds", e))?;

        if !conflicts.is_empty() {
            let seats = conflicts
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect::<Vec<SeatLabel>>();
            return Err(ReservationError::seats_unavailable(seats));
        }

        // Retire overdue PENDING holds on these seats so the partial unique
        // index accepts the rebind.
        sqlx::query(
            r#"
            UPDATE reservation_seats rs
            SET active = FALSE
            FROM reservations r
            WHERE r.id = rs.reservation_id
              AND rs.showtime_id = $1
              AND rs.seat_label = ANY($2)
              AND rs.active
              AND r.status = 'pending'
              AND r.created_at <= $3
            "#,
        )
        .bind(reservation.showtime_id().as_uuid())
        .bind(&labels)
        .bind(pending_cutoff.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| infra("failed to retire overdue holds", e))?;

        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, room_id, showtime_id, dni, total_cents, status, created_at, cancelled_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(reservation.id().as_uuid())
        .bind(reservation.room_id().as_uuid())
        .bind(reservation.showtime_id().as_uuid())
        .bind(reservation.dni().as_str())
        .bind(reservation.total_cents())
        .bind(reservation.status().as_str())
        .bind(reservation.created_at().as_datetime())
        .bind(reservation.cancelled_at().map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("reservations_natural_key") {
                    return ReservationError::validation(
                        "created_at",
                        "a reservation with this key already exists",
                    );
                }
            }
            infra("failed to insert reservation", e)
        })?;

        for label in &labels {
            sqlx::query(
                r#"
                INSERT INTO reservation_seats (reservation_id, showtime_id, seat_label, active)
                VALUES ($1, $2, $3, TRUE)
                "#,
            )
            .bind(reservation.id().as_uuid())
            .bind(reservation.showtime_id().as_uuid())
            .bind(label)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.constraint() == Some("reservation_seats_active_uniq") {
                        if let Ok(seat) = label.parse::<SeatLabel>() {
                            return ReservationError::seats_unavailable(vec![seat]);
                        }
                    }
                }
                infra("failed to bind seat", e)
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| infra("failed to commit seat binding", e))?;
        Ok(())
    }

    async fn update_if_status(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> Result<(), ReservationError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| infra("failed to begin transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = $3, cancelled_at = $4
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(reservation.id().as_uuid())
        .bind(expected.as_str())
        .bind(reservation.status().as_str())
        .bind(reservation.cancelled_at().map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(|e| infra("failed to update reservation", e))?;

        if result.rows_affected() == 0 {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM reservations WHERE id = $1")
                    .bind(reservation.id().as_uuid())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| infra("failed to read reservation status", e))?;

            return match current {
                None => Err(ReservationError::NotFound(reservation.id())),
                Some(status) => Err(ReservationError::invalid_state(
                    status,
                    reservation.status().as_str(),
                )),
            };
        }

        if !reservation.status().is_active() {
            sqlx::query("UPDATE reservation_seats SET active = FALSE WHERE reservation_id = $1")
                .bind(reservation.id().as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| infra("failed to retire seat holds", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| infra("failed to commit status update", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, ReservationError> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "{} WHERE r.id = $1 GROUP BY r.id",
            SELECT_RESERVATION
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infra("failed to find reservation", e))?;

        row.map(Reservation::try_from).transpose()
    }

    async fn find_by_key(
        &self,
        key: &ReservationKey,
    ) -> Result<Option<Reservation>, ReservationError> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE r.room_id = $1 AND r.showtime_id = $2 AND r.dni = $3 AND r.created_at = $4
            GROUP BY r.id
            "#,
            SELECT_RESERVATION
        ))
        .bind(key.room_id.as_uuid())
        .bind(key.showtime_id.as_uuid())
        .bind(key.dni.as_str())
        .bind(key.created_at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infra("failed to find reservation by key", e))?;

        row.map(Reservation::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Reservation>, ReservationError> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            "{} GROUP BY r.id ORDER BY r.created_at DESC",
            SELECT_RESERVATION
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infra("failed to list reservations", e))?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn seats_held(
        &self,
        showtime_id: ShowtimeId,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<Vec<SeatLabel>, ReservationError> {
        let pending_cutoff = now.minus_minutes(pending_timeout_minutes);

        let labels: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT rs.seat_label
            FROM reservation_seats rs
            JOIN reservations r ON r.id = rs.reservation_id
            WHERE rs.showtime_id = $1
              AND (
                    r.status = 'confirmed'
                 OR (r.status = 'pending' AND r.created_at > $2)
              )
            ORDER BY rs.seat_label
            "#,
        )
        .bind(showtime_id.as_uuid())
        .bind(pending_cutoff.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infra("failed to read seat holds", e))?;

        labels
            .iter()
            .map(|s| {
                s.parse().map_err(|_| {
                    ReservationError::infrastructure(format!("invalid seat label in row: {}", s))
                })
            })
            .collect()
    }

    async fn find_overdue_pending(
        &self,
        now: Timestamp,
        pending_timeout_minutes: i64,
    ) -> Result<Vec<Reservation>, ReservationError> {
        let pending_cutoff = now.minus_minutes(pending_timeout_minutes);

        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE r.status = 'pending' AND r.created_at <= $1
            GROUP BY r.id
            ORDER BY r.created_at ASC
            "#,
            SELECT_RESERVATION
        ))
        .bind(pending_cutoff.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infra("failed to find overdue reservations", e))?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn count_active_for_showtime(
        &self,
        showtime_id: ShowtimeId,
    ) -> Result<u64, ReservationError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE showtime_id = $1 AND status IN ('pending', 'confirmed')
            "#,
        )
        .bind(showtime_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| infra("failed to count reservations", e))?;

        Ok(count as u64)
    }

    async fn delete(&self, id: ReservationId) -> Result<(), ReservationError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| infra("failed to delete reservation", e))?;

        if result.rows_affected() == 0 {
            return Err(ReservationError::NotFound(id));
        }
        Ok(())
    }
}
