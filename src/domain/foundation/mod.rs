//! Shared domain building blocks: identifiers, time, errors, state machines
//! and event infrastructure used across catalog, scheduling and reservation.

mod actor;
mod clock;
mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use actor::ActorRole;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent};
pub use ids::{Dni, MovieId, ReservationId, RoomId, ShowtimeId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
