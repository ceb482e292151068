//! Session domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Subscription plan chosen on the paywall.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Plan {
    Standard,
    Vip,
    Enterprise,
}

impl Plan {
    /// Display name used on the paywall.
    pub fn display_name(self) -> &'static str {
        match self {
            Plan::Standard => "Standard",
            Plan::Vip => "Priority (VIP)",
            Plan::Enterprise => "Enterprise",
        }
    }

    /// Monthly list price shown on the paywall.
    pub fn price(self) -> &'static str {
        match self {
            Plan::Standard => "$49/mo",
            Plan::Vip => "$199/mo",
            Plan::Enterprise => "Custom",
        }
    }

    pub fn features(self) -> &'static [&'static str] {
        match self {
            Plan::Standard => &["Shared review queue", "Basic risk detection", "Email support"],
            Plan::Vip => &[
                "Priority queue (12ms latency)",
                "Advanced hallucination checks",
                "Ghost audit reports",
            ],
            Plan::Enterprise => &[
                "Dedicated workers",
                "Custom compliance rules",
                "Kill switch and RBAC",
                "24/7 support",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    #[default]
    Inactive,
}

/// The store's cached projection of the identity provider's session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub subscription_status: SubscriptionStatus,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl Session {
    /// First characters of the bearer token, for display.
    pub fn token_preview(&self, len: usize) -> Option<String> {
        self.token
            .as_deref()
            .map(|token| token.chars().take(len).collect())
    }
}

/// What the user presents at the paywall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Email and password checked by the identity provider.
    Password { email: String, password: String },
    /// Demo login that only selects a plan.
    Plan(Plan),
}

/// A verified login, ready to be applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub email: Option<String>,
    pub plan: Plan,
    /// Token from the identity provider. When absent the store issues a demo token.
    pub access_token: Option<String>,
}

impl LoginGrant {
    pub fn for_plan(plan: Plan) -> Self {
        Self {
            email: None,
            plan,
            access_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_signed_out() {
        let session = Session::default();
        assert!(!session.is_authenticated);
        assert_eq!(session.subscription_status, SubscriptionStatus::Inactive);
        assert!(session.plan.is_none());
        assert!(session.token_preview(10).is_none());
    }

    #[test]
    fn test_token_preview_truncates() {
        let session = Session {
            token: Some("abcdefghijklmnop".to_string()),
            ..Session::default()
        };
        assert_eq!(session.token_preview(5).as_deref(), Some("abcde"));
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let session = Session {
            is_authenticated: true,
            subscription_status: SubscriptionStatus::Active,
            plan: Some(Plan::Vip),
            email: None,
            token: None,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["subscriptionStatus"], "active");
        assert_eq!(json["plan"], "vip");
    }
}
