//! End-to-end reservation flows against the in-memory adapters.
//!
//! These tests wire the application handlers the same way the binary does,
//! swapping Postgres for the in-memory ports and the wall clock for a
//! [`FixedClock`] so expiry windows can be crossed deterministically.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use proptest::prelude::*;

use taquilla::adapters::events::InMemoryEventPublisher;
use taquilla::adapters::memory::{
    InMemoryReservationLedger, InMemoryRoomRepository, InMemoryShowtimeRepository,
    InMemorySystemParameters,
};
use taquilla::adapters::mercadopago::MockPaymentGateway;
use taquilla::application::handlers::catalog::{CreateRoomCommand, CreateRoomHandler};
use taquilla::application::handlers::reservation::{
    CancelReservationCommand, CancelReservationHandler, CreateReservationCommand,
    CreateReservationHandler, HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
    ListAvailableSeatsHandler, ListAvailableSeatsQuery, WebhookOutcome,
};
use taquilla::application::handlers::scheduling::{ScheduleShowtimeCommand, ScheduleShowtimeHandler};
use taquilla::application::ExpirySweeper;
use taquilla::domain::catalog::SeatLabel;
use taquilla::domain::foundation::{
    ActorRole, Dni, FixedClock, MovieId, RoomId, ShowtimeId, Timestamp,
};
use taquilla::domain::reservation::{ReservationError, ReservationStatus};
use taquilla::domain::scheduling::Showtime;
use taquilla::ports::{ReservationLedger, SystemParameters};

fn ts(s: &str) -> Timestamp {
    Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
}

fn seats(labels: &[&str]) -> BTreeSet<SeatLabel> {
    labels.iter().map(|s| s.parse().unwrap()).collect()
}

/// In-memory stand-in for the production wiring.
struct App {
    rooms: Arc<InMemoryRoomRepository>,
    showtimes: Arc<InMemoryShowtimeRepository>,
    ledger: Arc<InMemoryReservationLedger>,
    gateway: Arc<MockPaymentGateway>,
    params: Arc<InMemorySystemParameters>,
    events: Arc<InMemoryEventPublisher>,
    clock: Arc<FixedClock>,
}

impl App {
    fn at(now: Timestamp) -> Self {
        Self::with_gateway(now, MockPaymentGateway::new())
    }

    fn with_gateway(now: Timestamp, gateway: MockPaymentGateway) -> Self {
        Self {
            rooms: Arc::new(InMemoryRoomRepository::new()),
            showtimes: Arc::new(InMemoryShowtimeRepository::new()),
            ledger: Arc::new(InMemoryReservationLedger::new()),
            gateway: Arc::new(gateway),
            params: Arc::new(InMemorySystemParameters::default()),
            events: Arc::new(InMemoryEventPublisher::new()),
            clock: Arc::new(FixedClock::at(now)),
        }
    }

    async fn create_room(&self, name: &str, rows: u16, seats_per_row: u16) -> RoomId {
        let handler = CreateRoomHandler::new(self.rooms.clone(), self.clock.clone());
        let room = handler
            .handle(CreateRoomCommand {
                name: name.to_string(),
                location: "Planta baja".to_string(),
                rows,
                seats_per_row,
                vip_seats: BTreeSet::new(),
            })
            .await
            .unwrap();
        room.id()
    }

    async fn schedule(&self, room_id: RoomId, start: &str, duration_minutes: u32) -> ShowtimeId {
        let handler = ScheduleShowtimeHandler::new(
            self.rooms.clone(),
            self.showtimes.clone(),
            self.params.clone(),
        );
        let showtime = handler
            .handle(ScheduleShowtimeCommand {
                room_id,
                movie_id: MovieId::new(),
                starts_at: ts(start),
                duration_minutes,
            })
            .await
            .unwrap();
        showtime.id()
    }

    fn create_reservation_handler(&self) -> CreateReservationHandler {
        CreateReservationHandler::new(
            self.rooms.clone(),
            self.showtimes.clone(),
            self.ledger.clone(),
            self.gateway.clone(),
            self.params.clone(),
            self.events.clone(),
            self.clock.clone(),
        )
    }

    fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.gateway.clone(),
            self.ledger.clone(),
            self.showtimes.clone(),
            self.params.clone(),
            self.events.clone(),
            self.clock.clone(),
        )
    }

    fn available_seats_handler(&self) -> ListAvailableSeatsHandler {
        ListAvailableSeatsHandler::new(
            self.rooms.clone(),
            self.showtimes.clone(),
            self.ledger.clone(),
            self.params.clone(),
            self.clock.clone(),
        )
    }

    fn sweeper(&self) -> ExpirySweeper {
        ExpirySweeper::new(
            self.ledger.clone(),
            self.params.clone(),
            self.events.clone(),
            self.clock.clone(),
            Duration::from_secs(60),
        )
    }

    async fn available_labels(&self, showtime_id: ShowtimeId) -> Vec<String> {
        self.available_seats_handler()
            .handle(ListAvailableSeatsQuery { showtime_id })
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.label.to_string())
            .collect()
    }
}

fn reservation_cmd(
    room_id: RoomId,
    showtime_id: ShowtimeId,
    dni: &str,
    labels: &[&str],
) -> CreateReservationCommand {
    CreateReservationCommand {
        room_id,
        showtime_id,
        dni: Dni::new(dni).unwrap(),
        seats: seats(labels),
        total_cents: 22000,
    }
}

#[tokio::test]
async fn booking_flow_create_pay_confirm() {
    let app = App::at(ts("2026-03-01T10:00:00Z"));
    let room_id = app.create_room("A1", 5, 6).await;
    let showtime_id = app.schedule(room_id, "2026-03-01T20:00:00Z", 120).await;

    let result = app
        .create_reservation_handler()
        .handle(reservation_cmd(room_id, showtime_id, "12345678", &["A1", "A2"]))
        .await
        .unwrap();
    assert_eq!(result.reservation.status(), ReservationStatus::Pending);
    assert!(result.redirect_url.is_some());

    let available = app.available_labels(showtime_id).await;
    assert_eq!(available.len(), 28);
    assert!(!available.contains(&"A1".to_string()));
    assert!(!available.contains(&"A2".to_string()));

    let payload = MockPaymentGateway::notification_payload(result.reservation.id(), "approved");
    let outcome = app
        .webhook_handler()
        .handle(HandlePaymentWebhookCommand { payload: payload.clone() })
        .await
        .unwrap();
    assert_eq!(outcome, WebhookOutcome::Confirmed);

    // Redelivery of the same notification is absorbed, not an error.
    let outcome = app
        .webhook_handler()
        .handle(HandlePaymentWebhookCommand { payload })
        .await
        .unwrap();
    assert_eq!(outcome, WebhookOutcome::AlreadyConfirmed);

    let stored = app
        .ledger
        .find_by_id(result.reservation.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status(), ReservationStatus::Confirmed);
}

#[tokio::test]
async fn concurrent_dnis_cannot_share_a_seat() {
    let app = App::at(ts("2026-03-01T10:00:00Z"));
    let room_id = app.create_room("A1", 5, 6).await;
    let showtime_id = app.schedule(room_id, "2026-03-01T20:00:00Z", 120).await;

    app.create_reservation_handler()
        .handle(reservation_cmd(room_id, showtime_id, "12345678", &["C3", "C4"]))
        .await
        .unwrap();

    let err = app
        .create_reservation_handler()
        .handle(reservation_cmd(room_id, showtime_id, "87654321", &["C4", "C5"]))
        .await
        .unwrap_err();
    match err {
        ReservationError::SeatsUnavailable(seats) => {
            assert_eq!(seats, vec!["C4".parse::<SeatLabel>().unwrap()]);
        }
        other => panic!("expected SeatsUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn n_way_race_for_one_seat_has_one_winner() {
    let app = App::at(ts("2026-03-01T10:00:00Z"));
    let room_id = app.create_room("A1", 5, 6).await;
    let showtime_id = app.schedule(room_id, "2026-03-01T20:00:00Z", 120).await;

    let app = Arc::new(app);
    let mut tasks = Vec::new();
    for i in 0..8u32 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let dni = format!("{:08}", 10_000_000 + i);
            app.create_reservation_handler()
                .handle(reservation_cmd(room_id, showtime_id, &dni, &["B3"]))
                .await
        }));
    }

    let mut winners = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => winners += 1,
            Err(ReservationError::SeatsUnavailable(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn gateway_outage_still_creates_pending_hold() {
    let app = App::with_gateway(
        ts("2026-03-01T10:00:00Z"),
        MockPaymentGateway::failing_preferences(),
    );
    let room_id = app.create_room("A1", 5, 6).await;
    let showtime_id = app.schedule(room_id, "2026-03-01T20:00:00Z", 120).await;

    let result = app
        .create_reservation_handler()
        .handle(reservation_cmd(room_id, showtime_id, "12345678", &["B1"]))
        .await
        .unwrap();
    assert_eq!(result.reservation.status(), ReservationStatus::Pending);
    assert!(result.redirect_url.is_none());

    // The seat is held; the sweeper will reclaim it if payment never starts.
    assert!(!app
        .available_labels(showtime_id)
        .await
        .contains(&"B1".to_string()));
}

#[tokio::test]
async fn sweeper_reclaims_overdue_hold() {
    let app = App::at(ts("2026-03-01T10:00:00Z"));
    let room_id = app.create_room("A1", 5, 6).await;
    let showtime_id = app.schedule(room_id, "2026-03-01T20:00:00Z", 120).await;

    let result = app
        .create_reservation_handler()
        .handle(reservation_cmd(room_id, showtime_id, "12345678", &["D2"]))
        .await
        .unwrap();

    // Default pending timeout is 15 minutes; cross it.
    app.clock.advance_minutes(16);

    // Availability already treats the overdue hold as free, pre-sweep.
    assert!(app
        .available_labels(showtime_id)
        .await
        .contains(&"D2".to_string()));

    let swept = app.sweeper().sweep_once().await.unwrap();
    assert_eq!(swept, 1);
    let stored = app
        .ledger
        .find_by_id(result.reservation.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status(), ReservationStatus::Expired);

    // A late approval for the swept hold is an anomaly, never a resurrection.
    let payload = MockPaymentGateway::notification_payload(result.reservation.id(), "approved");
    let outcome = app
        .webhook_handler()
        .handle(HandlePaymentWebhookCommand { payload })
        .await
        .unwrap();
    assert_eq!(outcome, WebhookOutcome::Anomaly);
    let stored = app
        .ledger
        .find_by_id(result.reservation.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status(), ReservationStatus::Expired);
}

#[tokio::test]
async fn customer_cancel_frees_seats_before_cutoff() {
    let app = App::at(ts("2026-03-01T10:00:00Z"));
    let room_id = app.create_room("A1", 5, 6).await;
    let showtime_id = app.schedule(room_id, "2026-03-01T20:00:00Z", 120).await;

    let result = app
        .create_reservation_handler()
        .handle(reservation_cmd(room_id, showtime_id, "12345678", &["E5"]))
        .await
        .unwrap();
    let payload = MockPaymentGateway::notification_payload(result.reservation.id(), "approved");
    app.webhook_handler()
        .handle(HandlePaymentWebhookCommand { payload })
        .await
        .unwrap();

    let handler = CancelReservationHandler::new(
        app.ledger.clone(),
        app.showtimes.clone(),
        app.params.clone(),
        app.events.clone(),
        app.clock.clone(),
    );
    let cancelled = handler
        .handle(CancelReservationCommand {
            key: result.reservation.key(),
            actor: ActorRole::Customer,
        })
        .await
        .unwrap();
    assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
    assert!(app
        .available_labels(showtime_id)
        .await
        .contains(&"E5".to_string()));
}

#[tokio::test]
async fn customer_cancel_inside_cutoff_is_rejected() {
    // Default cutoff is 120 minutes; 19:00 is inside it for a 20:00 start.
    let app = App::at(ts("2026-03-01T10:00:00Z"));
    let room_id = app.create_room("A1", 5, 6).await;
    let showtime_id = app.schedule(room_id, "2026-03-01T20:00:00Z", 120).await;

    let result = app
        .create_reservation_handler()
        .handle(reservation_cmd(room_id, showtime_id, "12345678", &["E1"]))
        .await
        .unwrap();
    let payload = MockPaymentGateway::notification_payload(result.reservation.id(), "approved");
    app.webhook_handler()
        .handle(HandlePaymentWebhookCommand { payload })
        .await
        .unwrap();

    app.clock.set(ts("2026-03-01T19:00:00Z"));

    let handler = CancelReservationHandler::new(
        app.ledger.clone(),
        app.showtimes.clone(),
        app.params.clone(),
        app.events.clone(),
        app.clock.clone(),
    );
    let cmd = CancelReservationCommand {
        key: result.reservation.key(),
        actor: ActorRole::Customer,
    };
    assert!(handler.handle(cmd.clone()).await.is_err());

    // Admins are exempt from the cutoff.
    let cancelled = handler
        .handle(CancelReservationCommand {
            actor: ActorRole::Admin,
            ..cmd
        })
        .await
        .unwrap();
    assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
}

#[tokio::test]
async fn policy_edit_applies_to_running_handlers() {
    let app = App::at(ts("2026-03-01T10:00:00Z"));
    let room_id = app.create_room("A1", 5, 6).await;
    let showtime_id = app.schedule(room_id, "2026-03-01T20:00:00Z", 120).await;

    app.create_reservation_handler()
        .handle(reservation_cmd(room_id, showtime_id, "12345678", &["A3"]))
        .await
        .unwrap();

    // Stretch the pending timeout past the sweep point; no restart involved.
    let mut policy = app.params.get().await.unwrap();
    policy.pending_timeout_minutes = 60;
    app.params.update(policy).await.unwrap();

    app.clock.advance_minutes(30);
    let swept = app.sweeper().sweep_once().await.unwrap();
    assert_eq!(swept, 0);
}

proptest! {
    /// Overlap is symmetric for any pair of slots in the same room,
    /// whatever the buffer.
    #[test]
    fn showtime_conflict_is_symmetric(
        start_a in 0i64..10_000,
        start_b in 0i64..10_000,
        dur_a in 1u32..480,
        dur_b in 1u32..480,
        buffer in 0i64..120,
    ) {
        let room_id = RoomId::new();
        let base = ts("2026-03-01T00:00:00Z");
        let a = Showtime::new(room_id, MovieId::new(), base.plus_minutes(start_a), dur_a).unwrap();
        let b = Showtime::new(room_id, MovieId::new(), base.plus_minutes(start_b), dur_b).unwrap();
        prop_assert_eq!(a.conflicts_with(&b, buffer), b.conflicts_with(&a, buffer));
    }

    /// Back-to-back slots separated by exactly the buffer never conflict.
    #[test]
    fn buffer_boundary_is_exclusive(
        start in 0i64..10_000,
        duration in 1u32..480,
        buffer in 0i64..120,
    ) {
        let room_id = RoomId::new();
        let base = ts("2026-03-01T00:00:00Z");
        let first = Showtime::new(room_id, MovieId::new(), base.plus_minutes(start), duration).unwrap();
        let second = Showtime::new(
            room_id,
            MovieId::new(),
            base.plus_minutes(start + i64::from(duration) + buffer),
            duration,
        )
        .unwrap();
        prop_assert!(!first.conflicts_with(&second, buffer));
        prop_assert!(!second.conflicts_with(&first, buffer));
    }
}
