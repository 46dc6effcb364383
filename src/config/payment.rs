//! Payment gateway configuration (Mercado Pago)

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Mercado Pago access token
    pub access_token: String,

    /// Webhook signing secret
    pub webhook_secret: String,

    /// Where the checkout sends the customer back after paying
    pub back_url: String,
}

impl PaymentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.access_token.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT access_token"));
        }
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT webhook_secret"));
        }
        if !self.back_url.starts_with("http://") && !self.back_url.starts_with("https://") {
            return Err(ValidationError::InvalidBackUrl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_requires_token_secret_and_url() {
        assert!(PaymentConfig::default().validate().is_err());

        let config = PaymentConfig {
            access_token: "APP_USR-token".to_string(),
            webhook_secret: "secret".to_string(),
            back_url: "not-a-url".to_string(),
        };
        assert!(config.validate().is_err());

        let config = PaymentConfig {
            access_token: "APP_USR-token".to_string(),
            webhook_secret: "secret".to_string(),
            back_url: "https://cinema.example/checkout/done".to_string(),
        };
        assert!(config.validate().is_ok());
    }
}
