//! Binary entry point: config, pool, state wiring, sweeper, HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taquilla::adapters::events::TracingEventPublisher;
use taquilla::adapters::http::{api_router, AppState};
use taquilla::adapters::mercadopago::{MercadoPagoAdapter, MercadoPagoConfig};
use taquilla::adapters::postgres::{
    PostgresReservationLedger, PostgresRoomRepository, PostgresShowtimeRepository,
    PostgresSystemParameters,
};
use taquilla::application::ExpirySweeper;
use taquilla::config::AppConfig;
use taquilla::domain::foundation::SystemClock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let gateway = MercadoPagoAdapter::new(MercadoPagoConfig::new(
        config.payment.access_token.clone(),
        config.payment.webhook_secret.clone(),
        config.payment.back_url.clone(),
    ));
    let webhook_verifier = Arc::new(gateway.webhook_verifier());

    let state = AppState {
        rooms: Arc::new(PostgresRoomRepository::new(pool.clone())),
        showtimes: Arc::new(PostgresShowtimeRepository::new(pool.clone())),
        ledger: Arc::new(PostgresReservationLedger::new(pool.clone())),
        gateway: Arc::new(gateway),
        params: Arc::new(PostgresSystemParameters::new(pool.clone())),
        events: Arc::new(TracingEventPublisher::new()),
        clock: Arc::new(SystemClock::new()),
        webhook_verifier,
    };

    let sweeper = ExpirySweeper::new(
        state.ledger.clone(),
        state.params.clone(),
        state.events.clone(),
        state.clock.clone(),
        config.booking.sweep_interval(),
    );
    tokio::spawn(sweeper.run());

    let app = Router::new()
        .nest("/api", api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "taquilla listening");
    axum::serve(listener, app).await?;
    Ok(())
}
