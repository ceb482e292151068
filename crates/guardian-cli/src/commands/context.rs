//! Process bootstrap: configuration, repositories and use cases.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use guardian_application::{AuthUseCase, ReviewUseCase, StoreService};
use guardian_core::config::{GuardianConfig, SecretConfig};
use guardian_core::secret::SecretService;
use guardian_core::session::IdentityProvider;
use guardian_core::store::StateRepository;
use guardian_core::task::TaskRepository;
use guardian_infrastructure::{
    AsyncDirTaskRepository, DemoIdentityProvider, SecretServiceImpl, StateRepositoryImpl,
};
use guardian_interaction::{RestIdentityProvider, RestTaskRepository};

/// Everything a subcommand needs, built once per invocation.
pub struct AppContext {
    pub config: GuardianConfig,
    pub secrets: SecretConfig,
    pub store: Arc<StoreService>,
    pub auth: Arc<AuthUseCase>,
    pub reviews: ReviewUseCase,
}

impl AppContext {
    pub async fn bootstrap(home: Option<&Path>, config: GuardianConfig) -> Result<Self> {
        let secrets = SecretServiceImpl::new(home)
            .context("Failed to resolve secret file")?
            .load_secrets()
            .await
            .context("Failed to load secrets")?;
        let identity_key = secrets.identity.as_ref().map(|i| i.api_key.clone());

        let state_repository = Arc::new(
            StateRepositoryImpl::new(home)
                .await
                .context("Failed to open state file")?,
        );
        let cached_session = state_repository
            .get_state()
            .await
            .context("Failed to read persisted state")?
            .session;

        let task_repository: Arc<dyn TaskRepository> = match &config.backend.base_url {
            Some(base_url) => {
                let Some(key) = identity_key.clone() else {
                    bail!("backend.base_url is set but no identity API key was found");
                };
                let mut repository = RestTaskRepository::new(base_url.clone(), key);
                if let (Some(_), Some(token)) = (&cached_session.email, &cached_session.token) {
                    repository = repository.with_access_token(token.clone());
                }
                tracing::info!(url = %base_url, "Using REST task backend");
                Arc::new(repository)
            }
            None => Arc::new(
                AsyncDirTaskRepository::new(home)
                    .await
                    .context("Failed to open task directory")?,
            ),
        };

        let provider: Arc<dyn IdentityProvider> =
            match (&config.identity.base_url, identity_key) {
                (Some(base_url), Some(key)) => {
                    tracing::info!(url = %base_url, "Using REST identity provider");
                    Arc::new(RestIdentityProvider::new(base_url.clone(), key))
                }
                (base_url, _) => {
                    if base_url.is_some() {
                        tracing::warn!("identity.base_url is set but no API key was found; using demo accounts");
                    }
                    Arc::new(
                        DemoIdentityProvider::open(home)
                            .await
                            .context("Failed to open demo identity store")?,
                    )
                }
            };

        let store = Arc::new(
            StoreService::load(state_repository, task_repository, config.rate_limits.policy)
                .await
                .context("Failed to restore the store")?,
        );
        let auth = Arc::new(AuthUseCase::new(provider, Arc::clone(&store)));
        let reviews = ReviewUseCase::new(Arc::clone(&store));

        Ok(Self {
            config,
            secrets,
            store,
            auth,
            reviews,
        })
    }

    /// Drops a stale cached session. Provider outages keep the cached session.
    pub async fn verify_session(&self) {
        match self.auth.verify_session().await {
            Ok(live) => tracing::debug!(live, "Session verified"),
            Err(e) => tracing::warn!(error = %e, "Could not verify session; keeping cached session"),
        }
    }
}
