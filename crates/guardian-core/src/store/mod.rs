//! Application store.
//!
//! The store is the single source of truth for the session, the review queue,
//! the audit log, feature flags and dashboard stats. It is an explicit value
//! owned by the top-level context, never a global.
//!
//! # Module Structure
//!
//! - `command`: every mutation as a [`Command`] value, plus [`CommandOutcome`]
//! - `guard`: the one authorization check applied to every command
//! - `app_store`: [`AppStore`] and its command interpreter
//! - `persisted`: the subset of fields that survives a restart
//! - `repository`: [`StateRepository`] trait for that subset
//! - `shared`: [`SharedStore`], the handle used when timers and users write concurrently

mod app_store;
mod command;
mod guard;
mod persisted;
pub mod repository;
mod shared;

pub use app_store::{AppStore, MAX_TASKS};
pub use command::{Command, CommandOutcome};
pub use guard::{AccessDenied, Guard};
pub use persisted::{PersistedState, STORAGE_KEY};
pub use repository::StateRepository;
pub use shared::SharedStore;
