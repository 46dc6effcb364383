//! Seat Catalog - per-room seat inventory.
//!
//! Rooms have a fixed geometry (lettered rows, numbered seats) plus a set of
//! VIP seats. The catalog never tracks occupancy; that is the reservation
//! ledger's job.

mod errors;
mod room;
mod seat;

pub use errors::CatalogError;
pub use room::Room;
pub use seat::{Seat, SeatLabel};
