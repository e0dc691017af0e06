//! In-memory token validator for development and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::ports::TokenValidator;
use crate::domain::{AccessToken, Caller, Email, Error, Role};

#[derive(Debug, Clone)]
struct Grant {
    role: String,
    email: Email,
}

/// Token validator backed by a map of granted tokens.
///
/// Roles are stored as raw labels and parsed on every resolution, mirroring
/// an external identity service that hands back role strings. Tokens are
/// kept as [`AccessToken`] keys, so they are wiped on removal and print
/// redacted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenValidator {
    grants: Arc<RwLock<HashMap<AccessToken, Grant>>>,
}

impl InMemoryTokenValidator {
    /// Create a validator with no grants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `token` to `email` under the `role` label, replacing any
    /// previous grant for the same token.
    pub async fn grant(&self, token: &AccessToken, role: impl Into<String>, email: Email) {
        self.grants.write().await.insert(
            token.clone(),
            Grant {
                role: role.into(),
                email,
            },
        );
    }

    /// Withdraw a previously granted token.
    pub async fn revoke(&self, token: &AccessToken) {
        self.grants.write().await.remove(token);
    }
}

#[async_trait]
impl TokenValidator for InMemoryTokenValidator {
    async fn resolve(&self, token: &AccessToken) -> Result<Caller, Error> {
        let grant = self
            .grants
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| {
                debug!("unknown access token presented");
                Error::invalid_credentials()
            })?;
        let role: Role = grant.role.parse().map_err(|err| {
            warn!(email = %grant.email, %err, "token carries an unrecognised role");
            Error::invalid_credentials()
        })?;
        Ok(Caller::new(role, grant.email))
    }
}
