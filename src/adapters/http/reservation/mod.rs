//! HTTP adapter for the reservation ledger and payment webhook.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{reservation_routes, webhook_routes};
