//! Mercado Pago gateway adapter: checkout preferences, payment lookup,
//! webhook signature verification, and an in-process mock for tests.

mod adapter;
mod mock;
mod webhook;

pub use adapter::{MercadoPagoAdapter, MercadoPagoConfig};
pub use mock::MockPaymentGateway;
pub use webhook::{SignatureHeader, WebhookVerifier, WebhookVerifyError};

#[cfg(test)]
pub use webhook::sign_for_tests;
