//! PostgreSQL implementation of SystemParameters.
//!
//! The policy lives in a single-row table seeded by the initial migration;
//! reads always hit the database so admin edits apply immediately.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{BookingPolicy, SystemParameters};

pub struct PostgresSystemParameters {
    pool: PgPool,
}

impl PostgresSystemParameters {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PolicyRow {
    cleanup_buffer_minutes: i64,
    pending_timeout_minutes: i64,
    cancellation_cutoff_minutes: i64,
    min_lead_time_minutes: i64,
}

impl From<PolicyRow> for BookingPolicy {
    fn from(row: PolicyRow) -> Self {
        BookingPolicy {
            cleanup_buffer_minutes: row.cleanup_buffer_minutes,
            pending_timeout_minutes: row.pending_timeout_minutes,
            cancellation_cutoff_minutes: row.cancellation_cutoff_minutes,
            min_lead_time_minutes: row.min_lead_time_minutes,
        }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl SystemParameters for PostgresSystemParameters {
    async fn get(&self) -> Result<BookingPolicy, DomainError> {
        let row: PolicyRow = sqlx::query_as(
            r#"
            SELECT cleanup_buffer_minutes, pending_timeout_minutes,
                   cancellation_cutoff_minutes, min_lead_time_minutes
            FROM booking_policy
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("failed to read booking policy", e))?;

        Ok(row.into())
    }

    async fn update(&self, policy: BookingPolicy) -> Result<(), DomainError> {
        policy.validate()?;

        sqlx::query(
            r#"
            UPDATE booking_policy SET
                cleanup_buffer_minutes = $1,
                pending_timeout_minutes = $2,
                cancellation_cutoff_minutes = $3,
                min_lead_time_minutes = $4
            "#,
        )
        .bind(policy.cleanup_buffer_minutes)
        .bind(policy.pending_timeout_minutes)
        .bind(policy.cancellation_cutoff_minutes)
        .bind(policy.min_lead_time_minutes)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("failed to update booking policy", e))?;

        Ok(())
    }
}
