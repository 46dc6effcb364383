//! Application layer - command/query handlers and background tasks.

pub mod handlers;
pub mod sweeper;

pub use sweeper::ExpirySweeper;
