//! Auth collaborator
//!
//! Supplies bearer tokens and identity lookups. Token acquisition and
//! refresh live entirely outside the engine; this trait only exposes
//! what the console needs for requests and ownership checks.

use async_trait::async_trait;

use crate::error::Result;

/// Identity and credentials supplied by the hosting application.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current bearer token for API requests.
    async fn bearer_token(&self) -> Result<String>;

    /// Username of the signed-in user, if known.
    fn username(&self) -> Option<String>;

    /// Whether the user administers the organization. Admins may
    /// mutate instances they do not own.
    fn is_org_admin(&self) -> bool;
}

/// Fixed-identity provider for tests and embedded hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    token: String,
    username: Option<String>,
    org_admin: bool,
}

impl StaticAuth {
    /// Provider for the given user.
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            token: "static-token".to_string(),
            username: Some(username.into()),
            org_admin: false,
        }
    }

    /// Provider for an organization admin.
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            org_admin: true,
            ..Self::user(username)
        }
    }

    /// Replace the token value.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }

    fn username(&self) -> Option<String> {
        self.username.clone()
    }

    fn is_org_admin(&self) -> bool {
        self.org_admin
    }
}
