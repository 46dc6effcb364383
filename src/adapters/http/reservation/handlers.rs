//! HTTP handlers for reservation endpoints and the payment webhook.

use std::collections::BTreeSet;

use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::application::handlers::reservation::{
    CancelReservationCommand, CreateReservationCommand, HandlePaymentWebhookCommand,
};
use crate::domain::catalog::SeatLabel;
use crate::domain::foundation::{Dni, ErrorCode, RoomId, ShowtimeId, Timestamp};
use crate::domain::reservation::{ReservationError, ReservationKey};

use super::super::auth::AuthenticatedActor;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{CreateReservationRequest, CreateReservationResponse, ReservationResponse};

/// POST /api/reservations - create a PENDING reservation and start checkout
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let dni = Dni::new(request.dni)?;
    let seats: BTreeSet<SeatLabel> = request
        .seats
        .iter()
        .map(|s| {
            s.parse::<SeatLabel>()
                .map_err(|e| ApiError::validation("seats", e.to_string()))
        })
        .collect::<Result<_, _>>()?;

    let cmd = CreateReservationCommand {
        room_id: RoomId::from_uuid(request.room_id),
        showtime_id: ShowtimeId::from_uuid(request.showtime_id),
        dni,
        seats,
        total_cents: request.total_cents,
    };

    let result = state.create_reservation_handler().handle(cmd).await?;
    let response = CreateReservationResponse {
        reservation: ReservationResponse::from(&result.reservation),
        redirect_url: result.redirect_url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/reservations - list all reservations
///
/// An empty ledger is a 404, preserving the source system's contract.
pub async fn list_reservations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let reservations = state.ledger.list().await?;
    if reservations.is_empty() {
        return Err(ApiError::new(
            ErrorCode::ReservationNotFound,
            "No reservations exist",
        ));
    }
    let response: Vec<ReservationResponse> =
        reservations.iter().map(ReservationResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/reservations/:room/:showtime/:dni/:created - composite-key lookup
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(params): Path<(Uuid, Uuid, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let key = parse_key(params)?;
    let reservation = state
        .ledger
        .find_by_key(&key)
        .await?
        .ok_or(ReservationError::NotFoundByKey)?;
    Ok(Json(ReservationResponse::from(&reservation)))
}

/// PUT /api/reservations/:room/:showtime/:dni/:created - cancel
pub async fn cancel_reservation(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(params): Path<(Uuid, Uuid, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CancelReservationCommand {
        key: parse_key(params)?,
        actor: actor.role,
    };
    let cancelled = state.cancel_reservation_handler().handle(cmd).await?;
    Ok(Json(ReservationResponse::from(&cancelled)))
}

/// DELETE /api/reservations/:room/:showtime/:dni/:created - hard delete (admin)
pub async fn delete_reservation(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(params): Path<(Uuid, Uuid, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    actor.require_admin("delete reservations")?;

    let key = parse_key(params)?;
    let reservation = state
        .ledger
        .find_by_key(&key)
        .await?
        .ok_or(ReservationError::NotFoundByKey)?;
    state.ledger.delete(reservation.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/webhooks/mercadopago - payment result delivery
///
/// Signature failures are 401 before the body is interpreted; processed
/// deliveries (including logged anomalies) are 200 so the gateway stops
/// retrying.
pub async fn handle_mercadopago_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("x-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::new(
                ErrorCode::InvalidWebhookSignature,
                "Missing x-signature header",
            )
        })?;

    state.webhook_verifier.verify(&body, signature).map_err(|e| {
        warn!(error = %e, "webhook signature verification failed");
        ApiError::new(ErrorCode::InvalidWebhookSignature, e.to_string())
    })?;

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
    };
    state.payment_webhook_handler().handle(cmd).await?;
    Ok(StatusCode::OK)
}

fn parse_key(
    (room_id, showtime_id, dni, created_at): (Uuid, Uuid, String, String),
) -> Result<ReservationKey, ApiError> {
    let dni = Dni::new(dni)?;
    let created = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|_| ApiError::validation("created_at", "must be an RFC 3339 timestamp"))?
        .with_timezone(&Utc);
    Ok(ReservationKey {
        room_id: RoomId::from_uuid(room_id),
        showtime_id: ShowtimeId::from_uuid(showtime_id),
        dni,
        created_at: Timestamp::from_datetime(created),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::state::testing::{state_at, TEST_WEBHOOK_SECRET};
    use crate::adapters::mercadopago::{sign_for_tests, MockPaymentGateway};
    use crate::domain::catalog::Room;
    use crate::domain::foundation::{ActorRole, MovieId};
    use crate::domain::reservation::ReservationStatus;
    use crate::domain::scheduling::Showtime;
    use std::collections::BTreeSet as Set;

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    struct Fixture {
        state: AppState,
        room_id: RoomId,
        showtime_id: ShowtimeId,
    }

    /// Room "A1" 5x6, movie at 20:00, clock at 10:00.
    async fn fixture() -> Fixture {
        let state = state_at(ts("2026-03-01T10:00:00Z"));
        let room = Room::new(
            "A1",
            "Planta baja",
            5,
            6,
            Set::new(),
            ts("2026-03-01T00:00:00Z"),
        )
        .unwrap();
        state.rooms.save(&room).await.unwrap();
        let showtime =
            Showtime::new(room.id(), MovieId::new(), ts("2026-03-01T20:00:00Z"), 120).unwrap();
        state.showtimes.save(&showtime).await.unwrap();

        Fixture {
            state,
            room_id: room.id(),
            showtime_id: showtime.id(),
        }
    }

    fn request(f: &Fixture, dni: &str, seats: &[&str]) -> CreateReservationRequest {
        CreateReservationRequest {
            room_id: *f.room_id.as_uuid(),
            showtime_id: *f.showtime_id.as_uuid(),
            dni: dni.to_string(),
            seats: seats.iter().map(|s| s.to_string()).collect(),
            total_cents: 22000,
        }
    }

    fn key_path(f: &Fixture, dni: &str, created: &str) -> (Uuid, Uuid, String, String) {
        (
            *f.room_id.as_uuid(),
            *f.showtime_id.as_uuid(),
            dni.to_string(),
            created.to_string(),
        )
    }

    #[tokio::test]
    async fn creates_pending_reservation() {
        let f = fixture().await;
        let result = create_reservation(
            State(f.state.clone()),
            Json(request(&f, "12345678", &["A1", "A2"])),
        )
        .await;
        assert!(result.is_ok());

        let stored = f.state.ledger.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status(), ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn taken_seat_is_conflict_naming_it() {
        let f = fixture().await;
        create_reservation(
            State(f.state.clone()),
            Json(request(&f, "12345678", &["A1", "A2"])),
        )
        .await
        .ok()
        .unwrap();

        let err = create_reservation(
            State(f.state.clone()),
            Json(request(&f, "87654321", &["A1", "A3"])),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.details.get("seats"), Some(&"A1".to_string()));
    }

    #[tokio::test]
    async fn invalid_dni_is_rejected() {
        let f = fixture().await;
        let err = create_reservation(
            State(f.state.clone()),
            Json(request(&f, "not-a-dni", &["A1"])),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_list_is_404() {
        let f = fixture().await;
        let err = list_reservations(State(f.state)).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn composite_key_lookup_roundtrips() {
        let f = fixture().await;
        create_reservation(State(f.state.clone()), Json(request(&f, "12345678", &["B2"])))
            .await
            .ok()
            .unwrap();
        let created = f.state.ledger.list().await.unwrap().remove(0);

        let path = key_path(
            &f,
            "12345678",
            &created.created_at().as_datetime().to_rfc3339(),
        );
        let result = get_reservation(State(f.state.clone()), Path(path)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn lookup_miss_is_404() {
        let f = fixture().await;
        let path = key_path(&f, "12345678", "2026-03-01T10:00:00+00:00");
        let err = get_reservation(State(f.state), Path(path)).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_created_at_is_400() {
        let f = fixture().await;
        let path = key_path(&f, "12345678", "yesterday");
        let err = get_reservation(State(f.state), Path(path)).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn customer_cancels_own_pending() {
        let f = fixture().await;
        create_reservation(State(f.state.clone()), Json(request(&f, "12345678", &["C4"])))
            .await
            .ok()
            .unwrap();
        let created = f.state.ledger.list().await.unwrap().remove(0);

        let path = key_path(
            &f,
            "12345678",
            &created.created_at().as_datetime().to_rfc3339(),
        );
        let actor = AuthenticatedActor {
            role: ActorRole::Customer,
        };
        let result = cancel_reservation(State(f.state.clone()), actor, Path(path)).await;
        assert!(result.is_ok());

        let stored = f.state.ledger.find_by_id(created.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn hard_delete_requires_admin() {
        let f = fixture().await;
        create_reservation(State(f.state.clone()), Json(request(&f, "12345678", &["D5"])))
            .await
            .ok()
            .unwrap();
        let created = f.state.ledger.list().await.unwrap().remove(0);
        let path = key_path(
            &f,
            "12345678",
            &created.created_at().as_datetime().to_rfc3339(),
        );

        let customer = AuthenticatedActor {
            role: ActorRole::Customer,
        };
        let err = delete_reservation(State(f.state.clone()), customer, Path(path.clone()))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let admin = AuthenticatedActor {
            role: ActorRole::Admin,
        };
        delete_reservation(State(f.state.clone()), admin, Path(path))
            .await
            .ok()
            .unwrap();
        assert!(f.state.ledger.find_by_id(created.id()).await.unwrap().is_none());
    }

    fn signed_headers(payload: &[u8]) -> HeaderMap {
        let timestamp = chrono::Utc::now().timestamp();
        let header = sign_for_tests(TEST_WEBHOOK_SECRET, timestamp, payload);
        let mut headers = HeaderMap::new();
        headers.insert("x-signature", header.parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn approved_webhook_confirms_reservation() {
        let f = fixture().await;
        create_reservation(State(f.state.clone()), Json(request(&f, "12345678", &["A1"])))
            .await
            .ok()
            .unwrap();
        let created = f.state.ledger.list().await.unwrap().remove(0);

        let payload = MockPaymentGateway::notification_payload(created.id(), "approved");
        let result = handle_mercadopago_webhook(
            State(f.state.clone()),
            signed_headers(&payload),
            Bytes::from(payload),
        )
        .await;
        assert!(result.is_ok());

        let stored = f.state.ledger.find_by_id(created.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn missing_signature_is_401() {
        let f = fixture().await;
        let payload = b"{}".to_vec();
        let err = handle_mercadopago_webhook(
            State(f.state),
            HeaderMap::new(),
            Bytes::from(payload),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tampered_body_is_401() {
        let f = fixture().await;
        let payload = b"{\"reservation_id\": \"x\"}".to_vec();
        let headers = signed_headers(&payload);
        let err = handle_mercadopago_webhook(
            State(f.state),
            headers,
            Bytes::from_static(b"{\"reservation_id\": \"y\"}"),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
