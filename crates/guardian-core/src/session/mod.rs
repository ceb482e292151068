//! Session domain module.
//!
//! - `model`: the cached session projection (`Session`, `Plan`, `Credentials`)
//! - `identity`: the identity provider seam that owns the truth about a user

pub mod identity;
mod model;

pub use identity::{AuthStateChange, Identity, IdentityProvider};
pub use model::{Credentials, LoginGrant, Plan, Session, SubscriptionStatus};
