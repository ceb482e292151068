//! Unified path management for Guardian files.
//!
//! Every file Guardian reads or writes lives under one base directory so a
//! single `--home` flag (or `GUARDIAN_HOME`) can relocate all of it.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/guardian/          # Base directory (dirs::config_dir() default)
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! ├── guardian-storage.json    # Persisted store state
//! ├── tasks/                   # One JSON file per review task
//! └── logs/                    # Rolling log files
//!     └── guardian.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use guardian_core::GuardianError;
use guardian_core::store::STORAGE_KEY;

/// Environment variable that overrides the base directory.
pub const HOME_ENV: &str = "GUARDIAN_HOME";

const APP_DIR_NAME: &str = "guardian";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for GuardianError {
    fn from(err: PathError) -> Self {
        GuardianError::config(err.to_string())
    }
}

/// Kinds of files and directories managed under the base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Secret,
    State,
    Identity,
    Task,
    Logs,
}

impl ServiceType {
    fn relative_path(self) -> String {
        match self {
            ServiceType::Config => "config.toml".to_string(),
            ServiceType::Secret => "secret.json".to_string(),
            ServiceType::State => format!("{STORAGE_KEY}.json"),
            ServiceType::Identity => "identity.json".to_string(),
            ServiceType::Task => "tasks".to_string(),
            ServiceType::Logs => "logs".to_string(),
        }
    }
}

/// Resolves Guardian paths relative to an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct GuardianPaths {
    base: Option<PathBuf>,
}

impl GuardianPaths {
    /// Creates a resolver. `None` falls back to `GUARDIAN_HOME`, then to the
    /// platform config directory.
    pub fn new(base: Option<&Path>) -> Self {
        let base = base
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(HOME_ENV).map(PathBuf::from));
        Self { base }
    }

    /// Returns the base directory all other paths hang off.
    pub fn base_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        Ok(self.base_dir()?.join(service.relative_path()))
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::Config)
    }

    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::Secret)
    }

    pub fn state_file(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::State)
    }

    pub fn identity_file(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::Identity)
    }

    pub fn tasks_dir(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::Task)
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::Logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_hang_off_explicit_base() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GuardianPaths::new(Some(temp_dir.path()));

        assert_eq!(paths.base_dir().unwrap(), temp_dir.path());
        assert_eq!(
            paths.config_file().unwrap(),
            temp_dir.path().join("config.toml")
        );
        assert_eq!(
            paths.state_file().unwrap(),
            temp_dir.path().join("guardian-storage.json")
        );
        assert_eq!(
            paths.identity_file().unwrap(),
            temp_dir.path().join("identity.json")
        );
        assert!(paths.tasks_dir().unwrap().ends_with("tasks"));
        assert!(paths.logs_dir().unwrap().starts_with(temp_dir.path()));
    }

    #[test]
    fn test_secret_file_under_base() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GuardianPaths::new(Some(temp_dir.path()));
        let secret = paths.secret_file().unwrap();
        assert!(secret.ends_with("secret.json"));
        assert!(secret.starts_with(temp_dir.path()));
    }
}
