//! Identity provider used when no identity endpoint is configured.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use guardian_core::error::{GuardianError, Result};
use guardian_core::session::{AuthStateChange, Identity, IdentityProvider, Plan};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use crate::paths::GuardianPaths;
use crate::storage::AtomicFile;

pub const DEMO_EMAIL: &str = "demo@guardian.local";
pub const DEMO_PASSWORD: &str = "guardian-demo";

const MIN_PASSWORD_LEN: usize = 6;
const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    user_id: String,
    password: String,
    #[serde(default)]
    plan: Option<Plan>,
}

/// Accounts plus live sessions keyed by access token.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Directory {
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, Identity>,
}

impl Directory {
    fn seeded() -> Self {
        let mut directory = Self::default();
        directory.add_account(DEMO_EMAIL, DEMO_PASSWORD, Some(Plan::Enterprise));
        directory
    }

    /// Adds or replaces an account, returning its user id.
    fn add_account(&mut self, email: &str, password: &str, plan: Option<Plan>) -> String {
        let user_id = Uuid::new_v4().to_string();
        let account = Account {
            user_id: user_id.clone(),
            password: password.to_string(),
            plan,
        };
        self.accounts.insert(normalize(email), account);
        user_id
    }

    fn open_session(&mut self, email: &str, user_id: String, plan: Option<Plan>) -> Identity {
        let identity = Identity {
            user_id,
            email: email.to_string(),
            access_token: Uuid::new_v4().to_string(),
            plan,
        };
        self.sessions
            .insert(identity.access_token.clone(), identity.clone());
        identity
    }
}

enum Backing {
    Memory(Mutex<Directory>),
    /// `identity.json`, shared by every process using the same home.
    File(Arc<AtomicFile<Directory>>),
}

/// Identity provider backed by a local account table.
///
/// Starts with one demo account ([`DEMO_EMAIL`] / [`DEMO_PASSWORD`]) on the
/// enterprise plan. [`DemoIdentityProvider::open`] keeps accounts and sessions
/// in `identity.json` so a login outlives the process; the other constructors
/// keep them in memory. Passwords are stored as given.
pub struct DemoIdentityProvider {
    backing: Backing,
    events: broadcast::Sender<AuthStateChange>,
}

impl Default for DemoIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoIdentityProvider {
    /// An in-memory provider holding only the demo account.
    pub fn new() -> Self {
        Self::with_backing(Backing::Memory(Mutex::new(Directory::seeded())))
    }

    /// An in-memory provider with no accounts at all.
    pub fn empty() -> Self {
        Self::with_backing(Backing::Memory(Mutex::new(Directory::default())))
    }

    /// Opens the account file under `base_dir` (or the default location),
    /// creating it with the demo account when missing.
    pub async fn open(base_dir: Option<&Path>) -> Result<Self> {
        let path = GuardianPaths::new(base_dir).identity_file()?;
        let file = Arc::new(AtomicFile::<Directory>::json(path));

        let loader = file.clone();
        let directory =
            tokio::task::spawn_blocking(move || loader.load_or_create(Directory::seeded()))
                .await
                .map_err(|e| GuardianError::internal(format!("Failed to join task: {}", e)))??;
        tracing::debug!(
            accounts = directory.accounts.len(),
            sessions = directory.sessions.len(),
            path = %file.path().display(),
            "Opened demo identity store"
        );

        Ok(Self::with_backing(Backing::File(file)))
    }

    fn with_backing(backing: Backing) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { backing, events }
    }

    /// Adds (or replaces) an account. File-backed providers write it through
    /// immediately.
    pub fn with_account(mut self, email: &str, password: &str, plan: Option<Plan>) -> Self {
        match &mut self.backing {
            Backing::Memory(directory) => {
                directory.get_mut().add_account(email, password, plan);
            }
            Backing::File(file) => {
                let written = file.update(Directory::seeded(), |directory| {
                    directory.add_account(email, password, plan);
                    Ok(())
                });
                if let Err(e) = written {
                    tracing::warn!(error = %e, email, "Failed to add demo account");
                }
            }
        }
        self
    }

    /// Runs `f` against the directory, writing file-backed changes under the
    /// file lock.
    async fn modify<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Directory) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        match &self.backing {
            Backing::Memory(directory) => f(&mut *directory.lock().await),
            Backing::File(file) => {
                let file = file.clone();
                tokio::task::spawn_blocking(move || -> Result<R> {
                    let mut result = None;
                    file.update(Directory::seeded(), |directory| {
                        result = Some(f(directory));
                        Ok(())
                    })?;
                    result.ok_or_else(|| GuardianError::internal("Identity update did not run"))?
                })
                .await
                .map_err(|e| GuardianError::internal(format!("Failed to join task: {}", e)))?
            }
        }
    }

    async fn read<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Directory) -> R + Send + 'static,
        R: Send + 'static,
    {
        match &self.backing {
            Backing::Memory(directory) => Ok(f(&*directory.lock().await)),
            Backing::File(file) => {
                let file = file.clone();
                let directory = tokio::task::spawn_blocking(move || file.load())
                    .await
                    .map_err(|e| GuardianError::internal(format!("Failed to join task: {}", e)))??
                    .unwrap_or_else(Directory::seeded);
                Ok(f(&directory))
            }
        }
    }

    fn announce(&self, change: AuthStateChange) {
        // No subscribers is fine
        let _ = self.events.send(change);
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityProvider for DemoIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let email = normalize(email);
        let password = password.to_string();

        let identity = self
            .modify(move |directory| {
                let (user_id, plan) = match directory.accounts.get(&email) {
                    Some(account) if account.password == password => {
                        (account.user_id.clone(), account.plan)
                    }
                    _ => return Err(GuardianError::auth("Invalid login credentials")),
                };
                Ok(directory.open_session(&email, user_id, plan))
            })
            .await?;

        self.announce(AuthStateChange::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let email = normalize(email);
        if !email.contains('@') {
            return Err(GuardianError::auth("Unable to validate email address"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(GuardianError::auth(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let password = password.to_string();

        let identity = self
            .modify(move |directory| {
                if directory.accounts.contains_key(&email) {
                    return Err(GuardianError::auth("User already registered"));
                }
                let user_id = directory.add_account(&email, &password, None);
                Ok(directory.open_session(&email, user_id, None))
            })
            .await?;

        self.announce(AuthStateChange::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let token = access_token.to_string();
        let removed = self
            .modify(move |directory| Ok(directory.sessions.remove(&token).is_some()))
            .await?;
        if removed {
            self.announce(AuthStateChange::SignedOut);
        }
        Ok(())
    }

    async fn get_session(&self, access_token: &str) -> Result<Option<Identity>> {
        let token = access_token.to_string();
        self.read(move |directory| directory.sessions.get(&token).cloned())
            .await
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
        self.events.subscribe()
    }
}
