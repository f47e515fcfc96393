//! Credential Providers
//!
//! The client resolves a bearer token per call from an injected provider.
//! Production and test implementations are interchangeable behind the trait.

use async_trait::async_trait;

/// Credential provider trait (Strategy pattern)
///
/// Implement this against the real identity backend (Cognito, Auth0, etc.).
/// Returning `None` means the call goes out unauthenticated.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Resolve the current bearer token, or `None` when no session exists
    async fn resolve_token(&self) -> Option<String>;
}

/// Provider that never yields a token
///
/// Stand-in until a real identity backend is wired up.
#[derive(Clone, Debug, Default)]
pub struct NullTokenProvider;

#[async_trait]
impl TokenProvider for NullTokenProvider {
    async fn resolve_token(&self) -> Option<String> {
        None
    }
}

/// Provider with a fixed token, for tests and local development
#[derive(Clone, Debug)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn resolve_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_provider_yields_none() {
        let provider = NullTokenProvider;
        assert_eq!(provider.resolve_token().await, None);
    }

    #[tokio::test]
    async fn test_static_provider_yields_token() {
        let provider = StaticTokenProvider::new("tok-123");
        assert_eq!(provider.resolve_token().await.as_deref(), Some("tok-123"));
    }
}
