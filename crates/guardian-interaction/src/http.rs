//! Error mapping shared by the HTTP clients.

use guardian_core::GuardianError;
use reqwest::{Response, StatusCode};
use serde_json::Value;

/// Maps a transport failure (DNS, connect, timeout, body decode).
pub(crate) fn request_error(service: &'static str, err: reqwest::Error) -> GuardianError {
    tracing::warn!(service, error = %err, "Upstream request failed");
    GuardianError::upstream(service, format!("request failed: {err}"))
}

/// Human-readable message from an error body.
///
/// Understands the common shapes `{"error": {"status", "message"}}`,
/// `{"error_description"}`, `{"msg"}` and `{"message"}`, falling back to the
/// raw body.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    if let Some(error) = value.get("error").filter(|e| e.is_object()) {
        let status = error.get("status").and_then(Value::as_str).unwrap_or_default();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(body);
        return if status.is_empty() {
            message.to_string()
        } else {
            format!("{status}: {message}")
        };
    }

    ["error_description", "msg", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

pub(crate) fn map_http_error(service: &'static str, status: StatusCode, body: &str) -> GuardianError {
    let message = error_message(body);
    tracing::warn!(service, status = status.as_u16(), %message, "Upstream returned an error");
    GuardianError::upstream(service, format!("{} {}", status.as_u16(), message))
}

/// Passes successful responses through and turns the rest into errors.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: Response,
) -> Result<Response, (StatusCode, String)> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| format!("Failed to read {service} error body"));
    Err((status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_error_shape() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_message(body), "RESOURCE_EXHAUSTED: Quota exceeded");
    }

    #[test]
    fn test_gotrue_error_shapes() {
        assert_eq!(
            error_message(r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(r#"{"code": 422, "msg": "User already registered"}"#),
            "User already registered"
        );
    }

    #[test]
    fn test_plain_text_body() {
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_map_http_error_is_upstream() {
        let err = map_http_error("backend", StatusCode::SERVICE_UNAVAILABLE, "down");
        assert!(err.is_upstream());
        assert_eq!(err.to_string(), "Upstream error from backend: 503 down");
    }
}
