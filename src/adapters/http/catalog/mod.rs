//! HTTP adapter for the room catalog.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::room_routes;
