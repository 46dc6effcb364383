//! Booking engine configuration.
//!
//! Only process-level knobs live here; the policy an admin edits at runtime
//! (cleanup buffer, pending timeout, cutoff, lead time) is stored in the
//! database behind the SystemParameters port.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// How often the expiry sweeper scans for overdue holds, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl BookingConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sweep_interval_secs == 0 || self.sweep_interval_secs > 3600 {
            return Err(ValidationError::InvalidSweeperInterval);
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    60
}
