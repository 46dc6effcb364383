//! In-memory adapters.
//!
//! Used by the integration tests and local development. The ledger
//! serializes every call behind one mutex, which trivially satisfies the
//! atomic check-and-bind and compare-and-set contracts.

mod reservation_ledger;
mod room_repository;
mod showtime_repository;
mod system_parameters;

pub use reservation_ledger::InMemoryReservationLedger;
pub use room_repository::InMemoryRoomRepository;
pub use showtime_repository::InMemoryShowtimeRepository;
pub use system_parameters::InMemorySystemParameters;
