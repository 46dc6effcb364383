//! System parameters port - admin-editable booking policy.
//!
//! Cleanup buffer, pending timeout, cancellation cutoff and minimum lead
//! time are named parameters an admin can edit at runtime. The scheduling
//! and reservation handlers and the sweeper read them on each use, so edits
//! take effect without a restart.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// The booking policy knobs, all in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Gap required between showtimes in the same room ("Tiempo de Limpieza").
    pub cleanup_buffer_minutes: i64,

    /// How long a PENDING reservation holds its seats before the sweeper
    /// reclaims it ("Tiempo máximo de reserva").
    pub pending_timeout_minutes: i64,

    /// How long before the showtime a CONFIRMED reservation can still be
    /// cancelled by a non-admin.
    pub cancellation_cutoff_minutes: i64,

    /// Minimum gap between "now" and a showtime's start for new reservations.
    pub min_lead_time_minutes: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            cleanup_buffer_minutes: 10,
            pending_timeout_minutes: 15,
            cancellation_cutoff_minutes: 120,
            min_lead_time_minutes: 0,
        }
    }
}

impl BookingPolicy {
    /// Rejects negative values; zero is allowed everywhere.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("cleanup_buffer_minutes", self.cleanup_buffer_minutes),
            ("pending_timeout_minutes", self.pending_timeout_minutes),
            ("cancellation_cutoff_minutes", self.cancellation_cutoff_minutes),
            ("min_lead_time_minutes", self.min_lead_time_minutes),
        ];
        for (name, value) in fields {
            if value < 0 {
                return Err(DomainError::validation(
                    name,
                    format!("{} cannot be negative, got {}", name, value),
                ));
            }
        }
        Ok(())
    }
}

/// Port for reading and updating the booking policy.
#[async_trait]
pub trait SystemParameters: Send + Sync {
    /// Current policy.
    async fn get(&self) -> Result<BookingPolicy, DomainError>;

    /// Replace the policy (admin action).
    async fn update(&self, policy: BookingPolicy) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_parameters_is_object_safe() {
        fn _accepts_dyn(_params: &dyn SystemParameters) {}
    }

    #[test]
    fn default_policy_matches_documented_values() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.cleanup_buffer_minutes, 10);
        assert_eq!(policy.pending_timeout_minutes, 15);
        assert_eq!(policy.cancellation_cutoff_minutes, 120);
        assert_eq!(policy.min_lead_time_minutes, 0);
    }

    #[test]
    fn validate_rejects_negative_values() {
        let policy = BookingPolicy {
            pending_timeout_minutes: -1,
            ..BookingPolicy::default()
        };
        assert!(policy.validate().is_err());
        assert!(BookingPolicy::default().validate().is_ok());
    }
}
