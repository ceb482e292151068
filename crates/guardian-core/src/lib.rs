pub mod error;
pub mod auth;
pub mod session;
pub mod task;
pub mod audit;
pub mod stats;
pub mod rate_limit;
pub mod view;
pub mod review;
pub mod wizard;
pub mod analysis;
pub mod config;
pub mod secret;
pub mod store;
pub mod simulation;

// Re-export common error type
pub use error::{GuardianError, Result};
