use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Capability role attached to the current session.
///
/// Only [`Role::Admin`] may run commands with real consequences (kill switch,
/// rate limits, task disposition). The other two roles are read-only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// Full write access. New logins start here.
    #[default]
    Admin,
    /// Read-only access to every screen.
    Viewer,
    /// Read-only access, intended for compliance reviewers.
    Auditor,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Two-letter badge shown next to the user in the header.
    pub fn badge(self) -> &'static str {
        match self {
            Role::Admin => "AD",
            Role::Viewer => "VI",
            Role::Auditor => "AU",
        }
    }
}
