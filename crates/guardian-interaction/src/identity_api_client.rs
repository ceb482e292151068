//! RestIdentityProvider - GoTrue-compatible identity REST client.

use async_trait::async_trait;
use guardian_core::error::{GuardianError, Result};
use guardian_core::session::{AuthStateChange, Identity, IdentityProvider, Plan};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::http::{ensure_success, error_message, map_http_error, request_error};

const SERVICE: &str = "identity";
const CHANNEL_CAPACITY: usize = 16;

/// [`IdentityProvider`] speaking the `/auth/v1` REST dialect.
pub struct RestIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
    events: broadcast::Sender<AuthStateChange>,
}

impl RestIdentityProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            events,
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.api_key)
    }

    async fn credential_call(&self, path: &str, email: &str, password: &str) -> Result<Identity> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .request(self.client.post(url))
            .json(&CredentialsBody { email, password })
            .send()
            .await
            .map_err(|err| request_error(SERVICE, err))?;

        let response = match ensure_success(SERVICE, response).await {
            Ok(response) => response,
            Err((status, body)) => return Err(map_credential_error(status, &body)),
        };

        let session: SessionResponse = response.json().await.map_err(|err| {
            GuardianError::upstream(SERVICE, format!("Failed to parse session: {err}"))
        })?;

        let identity = session.into_identity()?;
        tracing::info!(user_id = %identity.user_id, "Signed in");
        // No subscribers is fine
        let _ = self.events.send(AuthStateChange::SignedIn(identity.clone()));
        Ok(identity)
    }
}

/// Client-side failures (bad credentials, duplicate user, weak password) are
/// authentication errors; everything else is upstream.
fn map_credential_error(status: StatusCode, body: &str) -> GuardianError {
    if matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        let message = error_message(body);
        tracing::warn!(status = status.as_u16(), %message, "Identity provider rejected credentials");
        GuardianError::auth(message)
    } else {
        map_http_error(SERVICE, status, body)
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        self.credential_call("/auth/v1/token?grant_type=password", email, password)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        self.credential_call("/auth/v1/signup", email, password).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self
            .request(self.client.post(url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| request_error(SERVICE, err))?;

        match ensure_success(SERVICE, response).await {
            Ok(_) => {}
            // Token already dead; the session is gone either way
            Err((StatusCode::UNAUTHORIZED, _)) => {}
            Err((status, body)) => return Err(map_http_error(SERVICE, status, &body)),
        }

        let _ = self.events.send(AuthStateChange::SignedOut);
        Ok(())
    }

    async fn get_session(&self, access_token: &str) -> Result<Option<Identity>> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .request(self.client.get(url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| request_error(SERVICE, err))?;

        let response = match ensure_success(SERVICE, response).await {
            Ok(response) => response,
            Err((StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _)) => return Ok(None),
            Err((status, body)) => return Err(map_http_error(SERVICE, status, &body)),
        };

        let user: UserResponse = response.json().await.map_err(|err| {
            GuardianError::upstream(SERVICE, format!("Failed to parse user: {err}"))
        })?;
        Ok(Some(user.into_identity(access_token.to_string())))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
        self.events.subscribe()
    }
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
    user: Option<UserResponse>,
}

impl SessionResponse {
    fn into_identity(self) -> Result<Identity> {
        match (self.access_token, self.user) {
            (Some(token), Some(user)) => Ok(user.into_identity(token)),
            // Signup with email confirmation enabled returns no session
            _ => Err(GuardianError::auth(
                "No session returned; confirm the email address before signing in",
            )),
        }
    }
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Deserialize, Default)]
struct UserMetadata {
    #[serde(default)]
    plan: Option<String>,
}

impl UserResponse {
    fn into_identity(self, access_token: String) -> Identity {
        let plan = self
            .user_metadata
            .plan
            .and_then(|p| p.parse::<Plan>().ok());
        Identity {
            user_id: self.id,
            email: self.email.unwrap_or_default(),
            access_token,
            plan,
        }
    }
}
