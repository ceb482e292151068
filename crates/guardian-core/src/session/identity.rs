//! Identity provider trait.
//!
//! The identity provider owns the truth about who a user is. The store only
//! caches a projection of it (see [`super::Session`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::Plan;
use crate::error::Result;

/// A user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    /// Plan recorded in the user's metadata, if any.
    #[serde(default)]
    pub plan: Option<Plan>,
}

/// Notification published whenever the provider's session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStateChange {
    SignedIn(Identity),
    SignedOut,
}

/// Abstract identity/session provider.
///
/// Implementations map bad credentials to `GuardianError::Auth` and transport
/// failures to `GuardianError::Upstream`. None of them retry.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Creates an account and returns its first session.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Ends the session identified by `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<()>;

    /// Looks up the session for `access_token`.
    ///
    /// - `Ok(Some(_))`: the token is live
    /// - `Ok(None)`: the token is unknown or expired
    async fn get_session(&self, access_token: &str) -> Result<Option<Identity>>;

    /// Subscribes to sign-in/sign-out notifications.
    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange>;
}
