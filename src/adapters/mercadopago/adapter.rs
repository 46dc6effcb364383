//! Mercado Pago payment gateway adapter.
//!
//! Outbound: creates a checkout preference carrying the reservation id as
//! `external_reference`. Inbound: resolves a webhook notification by
//! fetching the referenced payment from the Payments API.
//!
//! Secrets are held in `secrecy::SecretString`; signature verification of
//! the webhook body lives in [`super::webhook::WebhookVerifier`] and runs in
//! the HTTP layer before the payload reaches this adapter.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::domain::reservation::{Reservation, ReservationError};
use crate::ports::{PaymentGateway, PaymentNotification, PaymentPreference, PaymentResult};

use super::webhook::WebhookVerifier;

/// Mercado Pago API configuration.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    access_token: SecretString,
    webhook_secret: SecretString,
    api_base_url: String,
    /// Where the checkout sends the customer back after paying.
    back_url: String,
}

impl MercadoPagoConfig {
    pub fn new(
        access_token: impl Into<String>,
        webhook_secret: impl Into<String>,
        back_url: impl Into<String>,
    ) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.mercadopago.com".to_string(),
            back_url: back_url.into(),
        }
    }

    /// Override the API base URL (for tests against a local server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Payment gateway adapter backed by the Mercado Pago REST API.
pub struct MercadoPagoAdapter {
    config: MercadoPagoConfig,
    http_client: reqwest::Client,
}

impl MercadoPagoAdapter {
    pub fn new(config: MercadoPagoConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Webhook verifier sharing this adapter's signing secret.
    pub fn webhook_verifier(&self) -> WebhookVerifier {
        WebhookVerifier::new(self.config.webhook_secret.clone())
    }

    fn map_status(status: &str) -> PaymentResult {
        match status {
            "approved" => PaymentResult::Approved,
            "rejected" | "cancelled" | "refunded" | "charged_back" => PaymentResult::Rejected,
            // pending, in_process, authorized, in_mediation
            _ => PaymentResult::Pending,
        }
    }
}

#[derive(Deserialize)]
struct PreferenceResponse {
    id: String,
    init_point: String,
}

/// `{"type":"payment","data":{"id":"..."}}` notification body.
#[derive(Deserialize)]
struct NotificationBody {
    #[serde(rename = "type")]
    topic: String,
    data: NotificationData,
}

#[derive(Deserialize)]
struct NotificationData {
    id: String,
}

#[derive(Deserialize)]
struct PaymentResponse {
    id: serde_json::Value,
    status: String,
    external_reference: Option<String>,
}

#[async_trait]
impl PaymentGateway for MercadoPagoAdapter {
    async fn create_preference(
        &self,
        reservation: &Reservation,
    ) -> Result<PaymentPreference, ReservationError> {
        let url = format!("{}/checkout/preferences", self.config.api_base_url);
        let seat_list = reservation
            .seats()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let body = json!({
            "items": [{
                "title": format!("Seats {}", seat_list),
                "quantity": 1,
                "unit_price": reservation.total_cents() as f64 / 100.0,
            }],
            "external_reference": reservation.id().to_string(),
            "back_urls": { "success": self.config.back_url, "failure": self.config.back_url },
            "notification_url": serde_json::Value::Null,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ReservationError::infrastructure(format!("mercadopago: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %text, "create_preference failed");
            return Err(ReservationError::infrastructure(format!(
                "mercadopago preference creation failed ({})",
                status
            )));
        }

        let preference: PreferenceResponse = response
            .json()
            .await
            .map_err(|e| ReservationError::infrastructure(format!("mercadopago: {}", e)))?;

        Ok(PaymentPreference {
            preference_id: preference.id,
            redirect_url: preference.init_point,
        })
    }

    async fn resolve_notification(
        &self,
        payload: &[u8],
    ) -> Result<PaymentNotification, ReservationError> {
        let body: NotificationBody = serde_json::from_slice(payload)
            .map_err(|e| ReservationError::validation("payload", e.to_string()))?;

        if body.topic != "payment" {
            return Err(ReservationError::validation(
                "type",
                format!("unsupported notification topic '{}'", body.topic),
            ));
        }

        let url = format!("{}/v1/payments/{}", self.config.api_base_url, body.data.id);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| ReservationError::infrastructure(format!("mercadopago: {}", e)))?;

        if !response.status().is_success() {
            return Err(ReservationError::infrastructure(format!(
                "mercadopago payment lookup failed ({})",
                response.status()
            )));
        }

        let payment: PaymentResponse = response
            .json()
            .await
            .map_err(|e| ReservationError::infrastructure(format!("mercadopago: {}", e)))?;

        let reference = payment.external_reference.ok_or_else(|| {
            ReservationError::validation("external_reference", "missing on payment")
        })?;
        let reservation_id = reference
            .parse()
            .map_err(|_| ReservationError::validation("external_reference", "not a valid id"))?;

        Ok(PaymentNotification {
            reservation_id,
            result: Self::map_status(&payment.status),
            payment_id: payment.id.to_string(),
        })
    }
}
