//! CancelShowtimeHandler - admin command to remove a showtime.

use std::sync::Arc;

use crate::domain::foundation::ShowtimeId;
use crate::domain::scheduling::ScheduleError;
use crate::ports::{ReservationLedger, ShowtimeRepository};

/// Command to cancel (delete) a showtime.
#[derive(Debug, Clone)]
pub struct CancelShowtimeCommand {
    pub showtime_id: ShowtimeId,
}

/// Handler for showtime cancellation.
///
/// Refuses while any non-terminal reservation still references the showtime.
pub struct CancelShowtimeHandler {
    showtimes: Arc<dyn ShowtimeRepository>,
    ledger: Arc<dyn ReservationLedger>,
}

impl CancelShowtimeHandler {
    pub fn new(showtimes: Arc<dyn ShowtimeRepository>, ledger: Arc<dyn ReservationLedger>) -> Self {
        Self { showtimes, ledger }
    }

    pub async fn handle(&self, cmd: CancelShowtimeCommand) -> Result<(), ScheduleError> {
        self.showtimes
            .find_by_id(cmd.showtime_id)
            .await?
            .ok_or(ScheduleError::NotFound(cmd.showtime_id))?;

        let active = self
            .ledger
            .count_active_for_showtime(cmd.showtime_id)
            .await
            .map_err(|e| ScheduleError::infrastructure(e.to_string()))?;
        if active > 0 {
            return Err(ScheduleError::has_active_reservations(cmd.showtime_id));
        }

        self.showtimes.delete(cmd.showtime_id).await
    }
}
