//! Per-request caller identity.
//!
//! The authentication middleware (in the server binary) resolves the
//! caller once per request and stores an `Identity` in the request
//! extensions. Handlers extract it and pass the actor id explicitly into
//! every service call — identity is never ambient shared state.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::ServiceError;

/// The caller identity for one request.
///
/// `None` means anonymous. Read paths degrade gracefully for anonymous
/// callers (like-status and follow-status report `false`); mutation paths
/// reject them with `Unauthorized`.
#[derive(Debug, Clone, Default)]
pub struct Identity(pub Option<String>);

impl Identity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    pub fn user_id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }

    /// The actor id, or `Unauthorized` for anonymous callers.
    pub fn require(&self) -> Result<&str, ServiceError> {
        self.0
            .as_deref()
            .ok_or_else(|| ServiceError::Unauthorized("login required".into()))
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Missing extension means the middleware did not run (tests,
        // unauthenticated routers) — treat as anonymous.
        Ok(parts.extensions.get::<Identity>().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_anonymous() {
        assert!(Identity::anonymous().require().is_err());
        assert_eq!(Identity::user("u1").require().unwrap(), "u1");
    }

    #[test]
    fn user_id_accessor() {
        assert_eq!(Identity::anonymous().user_id(), None);
        assert_eq!(Identity::user("u2").user_id(), Some("u2"));
        assert!(Identity::anonymous().is_anonymous());
    }
}
