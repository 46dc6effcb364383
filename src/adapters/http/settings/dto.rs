//! JSON types for the booking policy endpoints.

use serde::{Deserialize, Serialize};

use crate::ports::BookingPolicy;

/// Current booking policy, all values in minutes.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub cleanup_buffer_minutes: i64,
    pub pending_timeout_minutes: i64,
    pub cancellation_cutoff_minutes: i64,
    pub min_lead_time_minutes: i64,
}

impl From<BookingPolicy> for SettingsResponse {
    fn from(policy: BookingPolicy) -> Self {
        Self {
            cleanup_buffer_minutes: policy.cleanup_buffer_minutes,
            pending_timeout_minutes: policy.pending_timeout_minutes,
            cancellation_cutoff_minutes: policy.cancellation_cutoff_minutes,
            min_lead_time_minutes: policy.min_lead_time_minutes,
        }
    }
}

/// Full replacement of the booking policy.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsRequest {
    pub cleanup_buffer_minutes: i64,
    pub pending_timeout_minutes: i64,
    pub cancellation_cutoff_minutes: i64,
    pub min_lead_time_minutes: i64,
}

impl From<UpdateSettingsRequest> for BookingPolicy {
    fn from(request: UpdateSettingsRequest) -> Self {
        Self {
            cleanup_buffer_minutes: request.cleanup_buffer_minutes,
            pending_timeout_minutes: request.pending_timeout_minutes,
            cancellation_cutoff_minutes: request.cancellation_cutoff_minutes,
            min_lead_time_minutes: request.min_lead_time_minutes,
        }
    }
}
