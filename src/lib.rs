//! Taquilla - Cinema Ticketing Backend
//!
//! This crate implements a seat-reservation consistency engine for a cinema:
//! rooms, showtimes, and a reservation ledger that guarantees at most one
//! active reservation per seat per showtime.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
