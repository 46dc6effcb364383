//! Application configuration, loaded from environment variables.
//!
//! Variables use the `TAQUILLA` prefix with `__` separating sections, e.g.
//! `TAQUILLA__DATABASE__URL` or `TAQUILLA__PAYMENT__ACCESS_TOKEN`. A local
//! `.env` file is honored in development.

mod booking;
mod database;
mod error;
mod payment;
mod server;

pub use booking::BookingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Loads configuration from the environment, then validates it.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TAQUILLA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.booking.validate()?;
        Ok(())
    }
}
