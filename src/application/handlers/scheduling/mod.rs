//! Showtime registry handlers.

mod cancel_showtime;
mod schedule_showtime;

pub use cancel_showtime::{CancelShowtimeCommand, CancelShowtimeHandler};
pub use schedule_showtime::{ScheduleShowtimeCommand, ScheduleShowtimeHandler};
