//! Bearer token acquisition.
//!
//! The SDK never acquires tokens itself. Callers hand the client a
//! [`TokenProvider`] and every request attempt asks it for the token to
//! send, so refresh and caching policy live entirely with the caller.

use async_trait::async_trait;

use crate::error::{PortalError, PortalResult};

/// Source of bearer tokens for outgoing requests.
///
/// The client calls [`bearer_token`](Self::bearer_token) once per request
/// attempt and treats a failure like any other call failure; it is never
/// retried.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Produce the value for the `Authorization: Bearer` header.
    async fn bearer_token(&self) -> PortalResult<String>;
}

/// A fixed token, for service principals, scripted use, and tests.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wrap a fixed token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> PortalResult<String> {
        if self.token.is_empty() {
            return Err(PortalError::Token("no token configured".to_string()));
        }
        Ok(self.token.clone())
    }
}
