//! Roles and the demo session token.
//!
//! - `role`: the three capability roles (`admin`, `viewer`, `auditor`)
//! - `token`: a reversible, unsigned token used by the demo login flow

mod role;
pub mod token;

pub use role::Role;
pub use token::{TokenClaims, decode_token, issue_token};
