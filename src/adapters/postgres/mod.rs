//! PostgreSQL adapters backed by sqlx connection pools.

mod reservation_ledger;
mod room_repository;
mod showtime_repository;
mod system_parameters;

pub use reservation_ledger::PostgresReservationLedger;
pub use room_repository::PostgresRoomRepository;
pub use showtime_repository::PostgresShowtimeRepository;
pub use system_parameters::PostgresSystemParameters;
