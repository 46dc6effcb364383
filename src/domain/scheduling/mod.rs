//! Showtime Registry - scheduling movies into rooms without overlap.

mod errors;
mod showtime;

pub use errors::ScheduleError;
pub use showtime::Showtime;
