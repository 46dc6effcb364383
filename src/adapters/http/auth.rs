//! Caller role extraction.
//!
//! The upstream proxy authenticates callers and forwards their role in the
//! `X-Actor-Role` header. A missing header means an anonymous customer; a
//! malformed value is rejected outright.

use axum::response::IntoResponse;

use crate::domain::foundation::{ActorRole, ErrorCode};

use super::error::ApiError;

/// Caller identity as asserted by the edge.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedActor {
    pub role: ActorRole,
}

impl AuthenticatedActor {
    /// Gate for admin-only endpoints.
    pub fn require_admin(&self, action: &str) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::new(
                ErrorCode::Forbidden,
                format!("Only administrators may {}", action),
            ))
        }
    }
}

/// Rejection for a malformed role header.
#[derive(Debug)]
pub struct InvalidActorRole;

impl IntoResponse for InvalidActorRole {
    fn into_response(self) -> axum::response::Response {
        ApiError::new(
            ErrorCode::Unauthorized,
            "X-Actor-Role header carries an unknown role",
        )
        .into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = InvalidActorRole;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let role = match parts.headers.get("X-Actor-Role") {
                None => ActorRole::Customer,
                Some(value) => value
                    .to_str()
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(InvalidActorRole)?,
            };
            Ok(AuthenticatedActor { role })
        })
    }
}
