//! HTTP adapter for the showtime registry.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::showtime_routes;
