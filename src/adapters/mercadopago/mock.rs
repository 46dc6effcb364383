//! Mock payment gateway for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::foundation::ReservationId;
use crate::domain::reservation::{Reservation, ReservationError};
use crate::ports::{PaymentGateway, PaymentNotification, PaymentPreference, PaymentResult};

/// In-process gateway double. Preferences succeed with a deterministic
/// redirect unless the mock was built with [`MockPaymentGateway::failing_preferences`];
/// notifications are resolved from the payload itself rather than a remote
/// API, using the shape [`MockPaymentGateway::notification_payload`] builds.
#[derive(Default)]
pub struct MockPaymentGateway {
    fail_preferences: AtomicBool,
    preferences_created: AtomicUsize,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose `create_preference` always fails, for testing that a
    /// gateway outage still leaves the reservation pending.
    pub fn failing_preferences() -> Self {
        let mock = Self::new();
        mock.fail_preferences.store(true, Ordering::SeqCst);
        mock
    }

    /// How many preferences have been created.
    pub fn preferences_created(&self) -> usize {
        self.preferences_created.load(Ordering::SeqCst)
    }

    /// A webhook payload this mock resolves to the given outcome.
    /// `result` is one of `approved`, `pending`, `rejected`.
    pub fn notification_payload(reservation_id: ReservationId, result: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "reservation_id": reservation_id.to_string(),
            "result": result,
            "payment_id": format!("mp_mock_{}", reservation_id),
        }))
        .unwrap()
    }
}

#[derive(Deserialize)]
struct MockNotification {
    reservation_id: ReservationId,
    result: PaymentResult,
    payment_id: String,
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_preference(
        &self,
        reservation: &Reservation,
    ) -> Result<PaymentPreference, ReservationError> {
        if self.fail_preferences.load(Ordering::SeqCst) {
            return Err(ReservationError::infrastructure("mock gateway unavailable"));
        }
        self.preferences_created.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentPreference {
            preference_id: format!("pref_mock_{}", reservation.id()),
            redirect_url: format!("https://checkout.mock.test/pay/{}", reservation.id()),
        })
    }

    async fn resolve_notification(
        &self,
        payload: &[u8],
    ) -> Result<PaymentNotification, ReservationError> {
        let parsed: MockNotification = serde_json::from_slice(payload)
            .map_err(|e| ReservationError::validation("payload", e.to_string()))?;
        Ok(PaymentNotification {
            reservation_id: parsed.reservation_id,
            result: parsed.result,
            payment_id: parsed.payment_id,
        })
    }
}
