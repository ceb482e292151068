//! Demo session token.
//!
//! **This is a development stub, not authentication.** The token has the
//! three-part shape of a JWT (`header.payload.signature`, each part base64
//! encoded), but the signature is a random placeholder that nothing verifies.
//! Anyone can mint a token for any role. Real deployments must rely on the
//! identity provider's own session tokens instead.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;
use crate::session::Plan;

/// Lifetime of a freshly issued demo token, in milliseconds (24 hours).
pub const TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

const TOKEN_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claims carried in the token payload. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub role: Role,
    pub plan: Plan,
    pub exp: i64,
    pub iat: i64,
}

impl TokenClaims {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.exp
    }
}

/// Issues a demo token embedding `role` and `plan`, valid for [`TOKEN_TTL_MS`].
pub fn issue_token(role: Role, plan: Plan, now: DateTime<Utc>) -> String {
    let iat = now.timestamp_millis();
    let claims = TokenClaims {
        role,
        plan,
        exp: iat + TOKEN_TTL_MS,
        iat,
    };

    // Serializing a struct of plain enums and integers cannot fail.
    let payload = serde_json::to_string(&claims).unwrap_or_default();
    let signature = format!("sig_{}_{}", iat, rand::random::<u32>());

    format!(
        "{}.{}.{}",
        BASE64_STANDARD.encode(TOKEN_HEADER),
        BASE64_STANDARD.encode(payload),
        BASE64_STANDARD.encode(signature)
    )
}

/// Decodes a demo token.
///
/// Returns `None` unless the token has exactly three `.`-separated parts, the
/// payload decodes to valid claims, and the expiry is not in the past. The
/// signature part is never checked.
pub fn decode_token(token: &str, now: DateTime<Utc>) -> Option<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(parts = parts.len(), "Rejecting token with wrong part count");
        return None;
    }

    let claims = BASE64_STANDARD
        .decode(parts[1])
        .ok()
        .and_then(|raw| serde_json::from_slice::<TokenClaims>(&raw).ok());

    let Some(claims) = claims else {
        tracing::error!("Auth error: invalid token structure");
        return None;
    };

    if claims.is_expired_at(now) {
        tracing::warn!(exp = claims.exp, "Auth error: token expired");
        return None;
    }

    Some(claims)
}
