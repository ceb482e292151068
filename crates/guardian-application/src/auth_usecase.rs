//! Auth use case.
//!
//! Bridges the identity provider and the store's cached session. Provider
//! failures surface as `GuardianError::Auth` or `GuardianError::Upstream` and
//! leave the store untouched.

use std::sync::Arc;

use chrono::Utc;
use guardian_core::auth::{Role, decode_token};
use guardian_core::error::Result;
use guardian_core::session::{AuthStateChange, Credentials, IdentityProvider, LoginGrant, Plan};
use guardian_core::store::{Command, CommandOutcome};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::store_service::StoreService;

/// Plan assumed for provider accounts that carry no plan metadata.
pub const DEFAULT_ACCOUNT_PLAN: Plan = Plan::Standard;

pub struct AuthUseCase {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<StoreService>,
}

impl AuthUseCase {
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<StoreService>) -> Self {
        Self { provider, store }
    }

    /// Signs in and starts a session in the store.
    ///
    /// Plan logins are local demo logins; password logins go through the
    /// identity provider and keep its access token.
    pub async fn login(&self, credentials: Credentials) -> Result<CommandOutcome> {
        let grant = match credentials {
            Credentials::Plan(plan) => LoginGrant::for_plan(plan),
            Credentials::Password { email, password } => {
                let identity = self.provider.sign_in(&email, &password).await?;
                LoginGrant {
                    email: Some(identity.email),
                    plan: identity.plan.unwrap_or(DEFAULT_ACCOUNT_PLAN),
                    access_token: Some(identity.access_token),
                }
            }
        };
        self.store.execute(Command::Login(grant)).await
    }

    /// Registers a new account and starts a session on `plan`.
    pub async fn sign_up(&self, email: &str, password: &str, plan: Plan) -> Result<CommandOutcome> {
        let identity = self.provider.sign_up(email, password).await?;
        let grant = LoginGrant {
            email: Some(identity.email),
            plan: identity.plan.unwrap_or(plan),
            access_token: Some(identity.access_token),
        };
        self.store.execute(Command::Login(grant)).await
    }

    /// Ends the session locally, and at the provider when it owns the session.
    ///
    /// A provider failure is logged but never keeps the local session alive.
    pub async fn logout(&self) -> Result<CommandOutcome> {
        let session = self.store.store().read(|s| s.session().clone()).await;

        if let (Some(_), Some(token)) = (&session.email, &session.token) {
            if let Err(e) = self.provider.sign_out(token).await {
                tracing::warn!(error = %e, "Provider sign-out failed; clearing local session anyway");
            }
        }

        self.store.execute(Command::Logout).await
    }

    pub async fn set_role(&self, role: Role) -> Result<CommandOutcome> {
        self.store.execute(Command::SetRole(role)).await
    }

    /// Drops a cached session that is no longer valid.
    ///
    /// Provider sessions are checked with the provider; demo sessions are
    /// checked by decoding their token. Returns whether a session survives.
    pub async fn verify_session(&self) -> Result<bool> {
        let session = self.store.store().read(|s| s.session().clone()).await;
        if !session.is_authenticated {
            return Ok(false);
        }
        let Some(token) = session.token else {
            self.store.execute(Command::Logout).await?;
            return Ok(false);
        };

        let valid = if session.email.is_some() {
            self.provider.get_session(&token).await?.is_some()
        } else {
            decode_token(&token, Utc::now()).is_some()
        };

        if !valid {
            tracing::info!("Cached session expired; signing out");
            self.store.execute(Command::Logout).await?;
        }
        Ok(valid)
    }

    /// Applies provider sign-outs to the store until the provider goes away.
    pub fn spawn_state_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.provider.subscribe();
        let usecase = Arc::clone(self);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthStateChange::SignedOut) => {
                        if let Err(e) = usecase.store.execute(Command::Logout).await {
                            tracing::error!(error = %e, "Failed to persist provider sign-out");
                        }
                    }
                    Ok(AuthStateChange::SignedIn(identity)) => {
                        tracing::debug!(user_id = %identity.user_id, "Provider reported sign-in");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Auth state listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::GuardianError;
    use guardian_core::session::Identity;
    use crate::testing::{MemoryState, MemoryTasks};
    use async_trait::async_trait;
    use guardian_core::rate_limit::RateLimitPolicy;
    use tokio::sync::broadcast;

    struct FailingProvider {
        events: broadcast::Sender<AuthStateChange>,
    }

    impl FailingProvider {
        fn new() -> Self {
            Self {
                events: broadcast::channel(4).0,
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for FailingProvider {
        async fn sign_in(&self, _: &str, _: &str) -> Result<Identity> {
            Err(GuardianError::auth("Invalid login credentials"))
        }
        async fn sign_up(&self, _: &str, _: &str) -> Result<Identity> {
            Err(GuardianError::upstream("identity", "502 bad gateway"))
        }
        async fn sign_out(&self, _: &str) -> Result<()> {
            Err(GuardianError::upstream("identity", "timeout"))
        }
        async fn get_session(&self, _: &str) -> Result<Option<Identity>> {
            Ok(None)
        }
        fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
            self.events.subscribe()
        }
    }

    async fn usecase(provider: Arc<dyn IdentityProvider>) -> Arc<AuthUseCase> {
        let store = StoreService::load(
            Arc::new(MemoryState::default()),
            Arc::new(MemoryTasks::default()),
            RateLimitPolicy::Clamp,
        )
        .await
        .unwrap();
        Arc::new(AuthUseCase::new(provider, Arc::new(store)))
    }

    #[tokio::test]
    async fn test_plan_login_issues_demo_token() {
        let auth = usecase(Arc::new(FailingProvider::new())).await;

        auth.login(Credentials::Plan(Plan::Vip)).await.unwrap();

        let session = auth.store.store().read(|s| s.session().clone()).await;
        assert!(session.is_authenticated);
        let claims = decode_token(session.token.as_deref().unwrap(), Utc::now()).unwrap();
        assert_eq!(claims.plan, Plan::Vip);
        assert!(auth.verify_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_bad_credentials_leave_store_signed_out() {
        let auth = usecase(Arc::new(FailingProvider::new())).await;

        let err = auth
            .login(Credentials::Password {
                email: "a@b.co".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();

        assert!(err.is_auth());
        assert!(!auth.store.store().read(|s| s.is_authenticated()).await);
    }

    #[tokio::test]
    async fn test_sign_up_upstream_failure_propagates() {
        let auth = usecase(Arc::new(FailingProvider::new())).await;
        let err = auth.sign_up("a@b.co", "secret123", Plan::Standard).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_logout_survives_provider_failure() {
        let auth = usecase(Arc::new(FailingProvider::new())).await;
        auth.store
            .execute(Command::Login(LoginGrant {
                email: Some("a@b.co".into()),
                plan: Plan::Standard,
                access_token: Some("provider-token".into()),
            }))
            .await
            .unwrap();

        auth.logout().await.unwrap();

        assert!(!auth.store.store().read(|s| s.is_authenticated()).await);
    }

    #[tokio::test]
    async fn test_dead_provider_session_is_dropped() {
        let auth = usecase(Arc::new(FailingProvider::new())).await;
        auth.store
            .execute(Command::Login(LoginGrant {
                email: Some("a@b.co".into()),
                plan: Plan::Enterprise,
                access_token: Some("stale".into()),
            }))
            .await
            .unwrap();

        assert!(!auth.verify_session().await.unwrap());
        assert!(!auth.store.store().read(|s| s.is_authenticated()).await);
    }

    #[tokio::test]
    async fn test_listener_applies_provider_sign_out() {
        let provider = Arc::new(FailingProvider::new());
        let auth = usecase(provider.clone()).await;
        auth.login(Credentials::Plan(Plan::Standard)).await.unwrap();
        let handle = auth.spawn_state_listener();

        provider.events.send(AuthStateChange::SignedOut).unwrap();
        for _ in 0..50 {
            if !auth.store.store().read(|s| s.is_authenticated()).await {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(!auth.store.store().read(|s| s.is_authenticated()).await);
        handle.abort();
    }
}
