//! Secret management service trait.
//!
//! Defines the interface for loading API keys.

use crate::config::SecretConfig;
use crate::error::Result;

/// Service for loading secret configuration.
///
/// Implementations must never log secrets or put them in error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Checks whether the secret file exists.
    async fn secret_file_exists(&self) -> bool;
}
