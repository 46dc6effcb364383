//! In-memory system parameters store.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::{BookingPolicy, SystemParameters};

pub struct InMemorySystemParameters {
    policy: RwLock<BookingPolicy>,
}

impl InMemorySystemParameters {
    pub fn new(policy: BookingPolicy) -> Self {
        Self {
            policy: RwLock::new(policy),
        }
    }
}

impl Default for InMemorySystemParameters {
    fn default() -> Self {
        Self::new(BookingPolicy::default())
    }
}

#[async_trait]
impl SystemParameters for InMemorySystemParameters {
    async fn get(&self) -> Result<BookingPolicy, DomainError> {
        Ok(*self.policy.read().unwrap_or_else(|e| e.into_inner()))
    }

    async fn update(&self, policy: BookingPolicy) -> Result<(), DomainError> {
        policy.validate()?;
        *self.policy.write().unwrap_or_else(|e| e.into_inner()) = policy;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_takes_effect_on_next_get() {
        let params = InMemorySystemParameters::default();
        let mut policy = params.get().await.unwrap();
        policy.pending_timeout_minutes = 30;

        params.update(policy).await.unwrap();
        assert_eq!(params.get().await.unwrap().pending_timeout_minutes, 30);
    }

    #[tokio::test]
    async fn update_rejects_invalid_policy() {
        let params = InMemorySystemParameters::default();
        let policy = BookingPolicy {
            cleanup_buffer_minutes: -5,
            ..BookingPolicy::default()
        };
        assert!(params.update(policy).await.is_err());
    }
}
