//! Payment gateway port (Mercado Pago style).
//!
//! Outbound: create a payment preference for a new reservation. Inbound:
//! resolve a webhook notification into a payment outcome. Webhook signature
//! verification happens in the adapter before `resolve_notification` runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ReservationId;
use crate::domain::reservation::{Reservation, ReservationError};

/// Port for the external payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment preference for a freshly created reservation.
    ///
    /// The reservation id travels as the preference's external reference so
    /// the webhook can be routed back. Operations must be safe to retry.
    async fn create_preference(
        &self,
        reservation: &Reservation,
    ) -> Result<PaymentPreference, ReservationError>;

    /// Resolve a webhook notification body into a payment outcome by
    /// querying the gateway API for the referenced payment.
    async fn resolve_notification(
        &self,
        payload: &[u8],
    ) -> Result<PaymentNotification, ReservationError>;
}

/// A created payment preference: opaque gateway id plus checkout redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPreference {
    pub preference_id: String,
    pub redirect_url: String,
}

/// Payment outcome extracted from a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    pub reservation_id: ReservationId,
    pub result: PaymentResult,
    /// Gateway's payment id, for logging and reconciliation.
    pub payment_id: String,
}

/// Terminal-or-not outcome reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentResult {
    Approved,
    Pending,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn payment_result_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentResult::Approved).unwrap(),
            "\"approved\""
        );
        let parsed: PaymentResult = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, PaymentResult::Rejected);
    }
}
