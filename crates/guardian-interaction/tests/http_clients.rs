//! Exercises the HTTP clients against a one-shot local server.

use guardian_core::analysis::{ContentAnalyzer, RiskLevel};
use guardian_core::session::IdentityProvider;
use guardian_core::task::TaskRepository;
use guardian_interaction::{GeminiApiClient, RestIdentityProvider, RestTaskRepository};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves exactly one HTTP response and returns the raw request it received.
async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some((head, rest)) = text.split_once("\r\n\r\n") {
                let length = head
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if rest.len() >= length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
    .to_string()
}

#[tokio::test]
async fn analyze_content_parses_embedded_json() {
    let reply = gemini_reply(
        "```json\n{\"content\":\"email\",\"riskLevel\":\"critical\",\"flags\":[\"SSN\"],\"suggestions\":[\"redact\"]}\n```",
    );
    let (base_url, server) = serve_once("200 OK", &reply).await;
    let client = GeminiApiClient::new("test-key", "gemini-2.5-flash").with_base_url(base_url);

    let assessment = client.analyze_content("SSN 123-45-6789", Some("HR")).await.unwrap();

    assert_eq!(assessment.risk_level, RiskLevel::Critical);
    assert_eq!(assessment.flags, vec!["SSN"]);
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /gemini-2.5-flash:generateContent?key=test-key"));
    assert!(request.contains("Context: HR"));
}

#[tokio::test]
async fn analyze_content_falls_back_to_raw_text() {
    let (base_url, _server) = serve_once("200 OK", &gemini_reply("Nothing risky here.")).await;
    let client = GeminiApiClient::new("k", "m").with_base_url(base_url);

    let assessment = client.analyze_content("hello", None).await.unwrap();

    assert_eq!(assessment.content, "Nothing risky here.");
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert!(assessment.flags.is_empty());
}

#[tokio::test]
async fn redaction_falls_back_to_input() {
    let (base_url, _server) = serve_once("200 OK", &gemini_reply("I cannot do that.")).await;
    let client = GeminiApiClient::new("k", "m").with_base_url(base_url);

    let result = client.detect_and_redact_pii("Call Bob").await.unwrap();

    assert_eq!(result.redacted_text, "Call Bob");
    assert!(result.detected_pii.is_empty());
}

#[tokio::test]
async fn gemini_http_error_is_upstream() {
    let body = r#"{"error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}}"#;
    let (base_url, _server) = serve_once("503 Service Unavailable", body).await;
    let client = GeminiApiClient::new("k", "m").with_base_url(base_url);

    let err = client.generate_suggestions("hi", &[]).await.unwrap_err();

    assert!(err.is_upstream());
    assert!(err.to_string().contains("UNAVAILABLE: overloaded"));
}

#[tokio::test]
async fn identity_sign_in_maps_session() {
    let body = r#"{"access_token":"jwt-1","user":{"id":"u-1","email":"ops@example.com","user_metadata":{"plan":"enterprise"}}}"#;
    let (base_url, server) = serve_once("200 OK", body).await;
    let provider = RestIdentityProvider::new(base_url, "anon");
    let mut events = provider.subscribe();

    let identity = provider.sign_in("ops@example.com", "pw").await.unwrap();

    assert_eq!(identity.access_token, "jwt-1");
    assert!(matches!(
        events.recv().await.unwrap(),
        guardian_core::session::AuthStateChange::SignedIn(_)
    ));
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /auth/v1/token?grant_type=password"));
    assert!(request.to_lowercase().contains("apikey: anon"));
}

#[tokio::test]
async fn identity_bad_credentials_is_auth_error() {
    let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
    let (base_url, _server) = serve_once("400 Bad Request", body).await;
    let provider = RestIdentityProvider::new(base_url, "anon");

    let err = provider.sign_in("x@y.z", "wrong").await.unwrap_err();

    assert!(err.is_auth());
}

#[tokio::test]
async fn identity_expired_token_has_no_session() {
    let (base_url, _server) = serve_once("401 Unauthorized", r#"{"msg":"invalid JWT"}"#).await;
    let provider = RestIdentityProvider::new(base_url, "anon");

    assert!(provider.get_session("stale").await.unwrap().is_none());
}

#[tokio::test]
async fn task_backend_lists_newest_first_query() {
    let body = r#"[{"id":"t-1","client_id":"FinCorp (Standard)","tier":"standard","input":"i","ai_draft":"d","confidence":80,"status":"pending","risk_flag":false,"created_at":"2026-01-01T00:00:00Z"}]"#;
    let (base_url, server) = serve_once("200 OK", body).await;
    let repo = RestTaskRepository::new(base_url, "anon");

    let tasks = repo.list_all().await.unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "t-1");
    let request = server.await.unwrap();
    assert!(request.contains("order=created_at.desc"));
}

#[tokio::test]
async fn unreachable_backend_is_upstream() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let repo = RestTaskRepository::new(base_url, "anon");

    assert!(repo.list_all().await.unwrap_err().is_upstream());
}
