//! HandlePaymentWebhookHandler - routes gateway payment outcomes through
//! the reservation state machine.
//!
//! The caller is the payment gateway, not an end user, so anomalies
//! (results for unknown or already-terminal reservations) are logged and
//! acknowledged rather than surfaced as errors; the gateway would otherwise
//! retry forever.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{ActorRole, Clock, EventId, SerializableDomainEvent};
use crate::domain::reservation::{ReservationCancelled, ReservationError, ReservationStatus};
use crate::ports::{
    EventPublisher, PaymentGateway, PaymentResult, ReservationLedger, ShowtimeRepository,
    SystemParameters,
};

use super::confirm_reservation::{ConfirmReservationCommand, ConfirmReservationHandler};

/// Command carrying the raw (already signature-verified) webhook body.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    pub payload: Vec<u8>,
}

/// What the webhook delivery amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Approved payment confirmed a pending reservation.
    Confirmed,
    /// Redelivery of an approval already applied.
    AlreadyConfirmed,
    /// Rejected payment cancelled the pending reservation.
    Cancelled,
    /// Gateway still processing; nothing to do yet.
    Acknowledged,
    /// Result arrived for an unknown or terminal reservation; logged only.
    Anomaly,
}

/// Handler for inbound payment webhooks.
pub struct HandlePaymentWebhookHandler {
    gateway: Arc<dyn PaymentGateway>,
    ledger: Arc<dyn ReservationLedger>,
    showtimes: Arc<dyn ShowtimeRepository>,
    params: Arc<dyn SystemParameters>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    confirm: ConfirmReservationHandler,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        ledger: Arc<dyn ReservationLedger>,
        showtimes: Arc<dyn ShowtimeRepository>,
        params: Arc<dyn SystemParameters>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let confirm =
            ConfirmReservationHandler::new(ledger.clone(), events.clone(), clock.clone());
        Self {
            gateway,
            ledger,
            showtimes,
            params,
            events,
            clock,
            confirm,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<WebhookOutcome, ReservationError> {
        let notification = self.gateway.resolve_notification(&cmd.payload).await?;

        let Some(mut reservation) = self.ledger.find_by_id(notification.reservation_id).await?
        else {
            warn!(
                reservation_id = %notification.reservation_id,
                payment_id = %notification.payment_id,
                "payment result for unknown reservation"
            );
            return Ok(WebhookOutcome::Anomaly);
        };

        match notification.result {
            PaymentResult::Pending => {
                info!(
                    reservation_id = %reservation.id(),
                    payment_id = %notification.payment_id,
                    "payment still pending at gateway"
                );
                Ok(WebhookOutcome::Acknowledged)
            }

            PaymentResult::Approved => {
                if reservation.status() == ReservationStatus::Confirmed {
                    return Ok(WebhookOutcome::AlreadyConfirmed);
                }

                let cmd = ConfirmReservationCommand {
                    reservation_id: reservation.id(),
                };
                match self.confirm.handle(cmd).await {
                    Ok(_) => Ok(WebhookOutcome::Confirmed),
                    // Terminal already, or lost a race against cancel/expire
                    // after the read.
                    Err(ReservationError::InvalidState { .. }) => {
                        warn!(
                            reservation_id = %reservation.id(),
                            status = %reservation.status(),
                            payment_id = %notification.payment_id,
                            "approved payment could not confirm; reconciliation anomaly"
                        );
                        Ok(WebhookOutcome::Anomaly)
                    }
                    Err(e) => Err(e),
                }
            }

            PaymentResult::Rejected => {
                if reservation.status() != ReservationStatus::Pending {
                    info!(
                        reservation_id = %reservation.id(),
                        status = %reservation.status(),
                        payment_id = %notification.payment_id,
                        "rejection for non-pending reservation; nothing to do"
                    );
                    return Ok(WebhookOutcome::Anomaly);
                }

                let now = self.clock.now();
                // Cutoff is irrelevant for pending cancels, so a missing
                // showtime or a lookup outage never blocks the cancel; the
                // outage still gets logged.
                let showtime_start = match self
                    .showtimes
                    .find_by_id(reservation.showtime_id())
                    .await
                {
                    Ok(Some(s)) => s.starts_at(),
                    Ok(None) => now,
                    Err(e) => {
                        warn!(
                            reservation_id = %reservation.id(),
                            showtime_id = %reservation.showtime_id(),
                            error = %e,
                            "showtime lookup failed while cancelling rejected payment"
                        );
                        now
                    }
                };
                let policy = self
                    .params
                    .get()
                    .await
                    .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

                reservation.cancel(
                    ActorRole::Customer,
                    now,
                    showtime_start,
                    policy.cancellation_cutoff_minutes,
                )?;
                match self
                    .ledger
                    .update_if_status(&reservation, ReservationStatus::Pending)
                    .await
                {
                    Ok(()) => {}
                    Err(ReservationError::InvalidState { .. }) => {
                        return Ok(WebhookOutcome::Anomaly);
                    }
                    Err(e) => return Err(e),
                }

                let event = ReservationCancelled {
                    event_id: EventId::new(),
                    reservation_id: reservation.id(),
                    cancelled_by_admin: false,
                    occurred_at: now,
                };
                self.events
                    .publish(event.to_envelope())
                    .await
                    .map_err(|e| ReservationError::infrastructure(e.to_string()))?;
                Ok(WebhookOutcome::Cancelled)
            }
        }
    }
}
