//! Secret service implementation.
//!
//! Reads API keys from `secret.json`, with environment variables taking
//! precedence over the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use guardian_core::config::{GeminiConfig, IdentityConfig, SecretConfig};
use guardian_core::error::{GuardianError, Result};
use guardian_core::secret::SecretService;
use tokio::sync::RwLock;

use crate::paths::GuardianPaths;
use crate::storage::AtomicFile;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const IDENTITY_API_KEY_ENV: &str = "GUARDIAN_IDENTITY_KEY";

/// Loads and caches [`SecretConfig`].
#[derive(Clone)]
pub struct SecretServiceImpl {
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    path: PathBuf,
}

impl SecretServiceImpl {
    pub fn new(base_dir: Option<&Path>) -> Result<Self> {
        let path = GuardianPaths::new(base_dir).secret_file()?;
        Ok(Self {
            secrets: Arc::new(RwLock::new(None)),
            path,
        })
    }

    async fn load_uncached(&self) -> Result<SecretConfig> {
        let file = AtomicFile::<SecretConfig>::json(self.path.clone());
        let from_file = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| GuardianError::internal(format!("Failed to join task: {}", e)))??
            .unwrap_or_default();

        Ok(apply_env_overrides(from_file, |key| std::env::var(key).ok()))
    }
}

/// Overlays non-empty environment values on top of file secrets.
pub fn apply_env_overrides(
    mut secrets: SecretConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> SecretConfig {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(api_key) = non_empty(GEMINI_API_KEY_ENV) {
        let model_name = secrets.gemini.take().and_then(|g| g.model_name);
        secrets.gemini = Some(GeminiConfig {
            api_key,
            model_name,
        });
    }
    if let Some(api_key) = non_empty(IDENTITY_API_KEY_ENV) {
        secrets.identity = Some(IdentityConfig { api_key });
    }
    secrets
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        if let Some(cached) = self.secrets.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = self.load_uncached().await?;
        *self.secrets.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn secret_file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_env_overrides_file_key_and_keeps_model() {
        let file = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "from-file".to_string(),
                model_name: Some("gemini-2.5-pro".to_string()),
            }),
            identity: None,
        };

        let merged = apply_env_overrides(file, |key| match key {
            GEMINI_API_KEY_ENV => Some("from-env".to_string()),
            IDENTITY_API_KEY_ENV => Some("  ".to_string()),
            _ => None,
        });

        let gemini = merged.gemini.unwrap();
        assert_eq!(gemini.api_key, "from-env");
        assert_eq!(gemini.model_name.as_deref(), Some("gemini-2.5-pro"));
        assert!(merged.identity.is_none());
    }

    #[tokio::test]
    async fn test_reads_secret_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("secret.json"),
            r#"{"identity": {"api_key": "anon-key"}}"#,
        )
        .unwrap();
        let service = SecretServiceImpl::new(Some(temp_dir.path())).unwrap();

        assert!(service.secret_file_exists().await);
        let secrets = service.load_secrets().await.unwrap();
        assert_eq!(secrets.identity.unwrap().api_key, "anon-key");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::new(Some(temp_dir.path())).unwrap();

        assert!(!service.secret_file_exists().await);
        assert!(service.load_secrets().await.is_ok());
    }
}
