//! ListAvailableSeatsHandler - catalog minus active holds.

use std::sync::Arc;

use crate::domain::catalog::Seat;
use crate::domain::foundation::{Clock, ShowtimeId};
use crate::domain::reservation::ReservationError;
use crate::ports::{ReservationLedger, RoomRepository, ShowtimeRepository, SystemParameters};

/// Query for the free seats of a showtime.
#[derive(Debug, Clone)]
pub struct ListAvailableSeatsQuery {
    pub showtime_id: ShowtimeId,
}

/// Handler for seat availability.
///
/// A PENDING hold past its timeout counts as free even before the sweeper
/// has expired it, so availability is never stale for longer than one read.
pub struct ListAvailableSeatsHandler {
    rooms: Arc<dyn RoomRepository>,
    showtimes: Arc<dyn ShowtimeRepository>,
    ledger: Arc<dyn ReservationLedger>,
    params: Arc<dyn SystemParameters>,
    clock: Arc<dyn Clock>,
}

impl ListAvailableSeatsHandler {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        showtimes: Arc<dyn ShowtimeRepository>,
        ledger: Arc<dyn ReservationLedger>,
        params: Arc<dyn SystemParameters>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            showtimes,
            ledger,
            params,
            clock,
        }
    }

    pub async fn handle(
        &self,
        query: ListAvailableSeatsQuery,
    ) -> Result<Vec<Seat>, ReservationError> {
        let showtime = self
            .showtimes
            .find_by_id(query.showtime_id)
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?
            .ok_or(ReservationError::ShowtimeNotFound(query.showtime_id))?;

        let room = self
            .rooms
            .find_by_id(showtime.room_id())
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?
            .ok_or(ReservationError::ShowtimeNotFound(query.showtime_id))?;

        let policy = self
            .params
            .get()
            .await
            .map_err(|e| ReservationError::infrastructure(e.to_string()))?;

        let held = self
            .ledger
            .seats_held(
                query.showtime_id,
                self.clock.now(),
                policy.pending_timeout_minutes,
            )
            .await?;

        Ok(room
            .seats()
            .into_iter()
            .filter(|seat| !held.contains(&seat.label))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryReservationLedger, InMemoryRoomRepository, InMemoryShowtimeRepository,
        InMemorySystemParameters,
    };
    use crate::domain::catalog::{Room, SeatLabel};
    use crate::domain::foundation::{Dni, FixedClock, MovieId, Timestamp};
    use crate::domain::reservation::Reservation;
    use crate::domain::scheduling::Showtime;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeSet;

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    struct Fixture {
        handler: ListAvailableSeatsHandler,
        ledger: Arc<InMemoryReservationLedger>,
        clock: Arc<FixedClock>,
        showtime: Showtime,
    }

    async fn fixture() -> Fixture {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let showtimes = Arc::new(InMemoryShowtimeRepository::new());
        let ledger = Arc::new(InMemoryReservationLedger::new());
        let clock = Arc::new(FixedClock::at(ts("2026-03-01T10:00:00Z")));

        let room = Room::new("A1", "loc", 5, 6, BTreeSet::new(), ts("2026-03-01T00:00:00Z")).unwrap();
        rooms.save(&room).await.unwrap();
        let showtime =
            Showtime::new(room.id(), MovieId::new(), ts("2026-03-01T20:00:00Z"), 120).unwrap();
        showtimes.save(&showtime).await.unwrap();

        let handler = ListAvailableSeatsHandler::new(
            rooms,
            showtimes,
            ledger.clone(),
            Arc::new(InMemorySystemParameters::default()),
            clock.clone(),
        );

        Fixture {
            handler,
            ledger,
            clock,
            showtime,
        }
    }

    async fn reserve(f: &Fixture, labels: &[&str], at: Timestamp) -> Reservation {
        let seats: BTreeSet<SeatLabel> = labels.iter().map(|s| s.parse().unwrap()).collect();
        let r = Reservation::new(
            f.showtime.room_id(),
            f.showtime.id(),
            Dni::new("12345678").unwrap(),
            seats,
            10000,
            at,
        )
        .unwrap();
        f.ledger.create_pending(&r, at, 15).await.unwrap();
        r
    }

    #[tokio::test]
    async fn full_catalog_when_nothing_is_held() {
        let f = fixture().await;
        let seats = f
            .handler
            .handle(ListAvailableSeatsQuery { showtime_id: f.showtime.id() })
            .await
            .unwrap();
        assert_eq!(seats.len(), 30);
    }

    #[tokio::test]
    async fn held_seats_are_subtracted() {
        let f = fixture().await;
        reserve(&f, &["A1", "A2"], f.clock.now()).await;

        let seats = f
            .handler
            .handle(ListAvailableSeatsQuery { showtime_id: f.showtime.id() })
            .await
            .unwrap();
        assert_eq!(seats.len(), 28);
        let labels: Vec<String> = seats.iter().map(|s| s.label.to_string()).collect();
        assert!(!labels.contains(&"A1".to_string()));
        assert!(!labels.contains(&"A2".to_string()));
    }

    #[tokio::test]
    async fn overdue_pending_seats_reappear_without_sweeper() {
        let f = fixture().await;
        reserve(&f, &["C3"], f.clock.now()).await;

        f.clock.advance_minutes(16);
        let seats = f
            .handler
            .handle(ListAvailableSeatsQuery { showtime_id: f.showtime.id() })
            .await
            .unwrap();
        assert_eq!(seats.len(), 30);
    }

    #[tokio::test]
    async fn unknown_showtime_fails() {
        let f = fixture().await;
        let result = f
            .handler
            .handle(ListAvailableSeatsQuery { showtime_id: ShowtimeId::new() })
            .await;
        assert!(matches!(result, Err(ReservationError::ShowtimeNotFound(_))));
    }
}
