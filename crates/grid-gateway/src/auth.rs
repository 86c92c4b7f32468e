//! Bearer credential providers
//!
//! The gateway asks the provider for a token before every call. A provider
//! with nothing to give stops the call before any request is built.

use std::fmt;

/// Source of the bearer credential attached to every call
pub trait AuthProvider: Send + Sync + fmt::Debug {
    /// Current token, `None` when unauthenticated
    fn token(&self) -> Option<String>;

    /// Check if a credential is available
    fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Fixed token, e.g. from a flag or environment variable
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Create token provider
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token from an environment variable, `None` when unset or blank
    #[must_use]
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(Self)
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticToken").field(&"<redacted>").finish()
    }
}

impl AuthProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone()).filter(|t| !t.trim().is_empty())
    }
}

/// No credential: every authenticated call is refused locally
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthProvider for NoAuth {
    fn token(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_token() {
        let auth = StaticToken::new("secret");
        assert_eq!(auth.token().as_deref(), Some("secret"));
        assert!(auth.is_authenticated());
        assert!(!format!("{auth:?}").contains("secret"));
    }

    #[test]
    fn blank_token_is_unauthenticated() {
        assert!(!StaticToken::new("  ").is_authenticated());
        assert!(!NoAuth.is_authenticated());
    }

    #[test]
    fn missing_env_var() {
        assert!(StaticToken::from_env("GRID_TEST_TOKEN_THAT_IS_NEVER_SET").is_none());
    }
}
