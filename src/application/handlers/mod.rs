//! Command and query handlers, one file per operation.

pub mod catalog;
pub mod reservation;
pub mod scheduling;
