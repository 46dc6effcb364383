//! ExpirySweeper - background task that expires overdue PENDING holds.
//!
//! The sweeper is a safety net, not the source of truth: `seats_held`
//! already treats overdue holds as free, so a slow sweep never blocks a
//! seat. Each overdue reservation is expired through the same handler path
//! as any other transition, and a failure on one item never aborts the
//! sweep of the rest.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::application::handlers::reservation::{
    ExpireReservationCommand, ExpireReservationHandler,
};
use crate::domain::foundation::Clock;
use crate::domain::reservation::ReservationError;
use crate::ports::{EventPublisher, ReservationLedger, SystemParameters};

pub struct ExpirySweeper {
    ledger: Arc<dyn ReservationLedger>,
    params: Arc<dyn SystemParameters>,
    clock: Arc<dyn Clock>,
    expire: ExpireReservationHandler,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(
        ledger: Arc<dyn ReservationLedger>,
        params: Arc<dyn SystemParameters>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        let expire = ExpireReservationHandler::new(
            ledger.clone(),
            params.clone(),
            events,
            clock.clone(),
        );
        Self {
            ledger,
            params,
            clock,
            expire,
            interval,
        }
    }

    /// Run forever, sweeping at the configured interval. Spawn this on its
    /// own task.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!(interval_secs = self.interval.as_secs(), "expiry sweeper started");
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep_once().await {
                error!(error = %e, "expiry sweep failed");
            }
        }
    }

    /// One sweep pass. Returns how many reservations were expired.
    pub async fn sweep_once(&self) -> Result<usize, ReservationError> {
        let policy = self
            .params
            .get()
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;
        let now = self.clock.now();

        let overdue = self
            .ledger
            .find_overdue_pending(now, policy.pending_timeout_minutes)
            .await?;
        if overdue.is_empty() {
            return Ok(0);
        }
        debug!(count = overdue.len(), "found overdue pending reservations");

        let mut expired = 0;
        for reservation in overdue {
            let cmd = ExpireReservationCommand {
                reservation_id: reservation.id(),
            };
            match self.expire.handle(cmd).await {
                Ok(_) => expired += 1,
                // Someone else transitioned it between the scan and the
                // expire; that is the race working as intended.
                Err(ReservationError::InvalidState { .. })
                | Err(ReservationError::NotFound(_)) => {
                    debug!(reservation_id = %reservation.id(), "overdue reservation already transitioned");
                }
                Err(e) => {
                    error!(reservation_id = %reservation.id(), error = %e, "failed to expire reservation");
                }
            }
        }
        if expired > 0 {
            info!(expired, "expired overdue reservations");
        }
        Ok(expired)
    }
}
