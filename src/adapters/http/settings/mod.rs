//! HTTP adapter for the admin-editable booking policy.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::settings_routes;
