//! Domain layer - pure business logic with no I/O dependencies.

pub mod catalog;
pub mod foundation;
pub mod reservation;
pub mod scheduling;
