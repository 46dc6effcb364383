//! Reservation Ledger domain core.
//!
//! Tracks, per (showtime, seat), which reservation currently holds it and
//! drives the PENDING / CONFIRMED / CANCELLED / EXPIRED lifecycle. The seat
//! occupancy record is owned here and mutated only through the state
//! transitions on the aggregate.

mod aggregate;
mod errors;
mod events;
mod status;

pub use aggregate::{Reservation, ReservationKey};
pub use errors::ReservationError;
pub use events::{
    ReservationCancelled, ReservationConfirmed, ReservationCreated, ReservationExpired,
};
pub use status::ReservationStatus;
