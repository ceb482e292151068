//! GeminiApiClient - content analysis over the Gemini REST API.
//!
//! Each operation is a single `generateContent` call. Structured answers are
//! recovered from the reply text with [`crate::json_extract`].

use async_trait::async_trait;
use guardian_core::analysis::{
    ChatMessage, ChatRole, ContentAnalyzer, RedactionResult, RiskAssessment,
};
use guardian_core::config::{DEFAULT_GEMINI_MODEL, SecretConfig};
use guardian_core::error::{GuardianError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http::{ensure_success, map_http_error, request_error};
use crate::json_extract::parse_embedded;

const SERVICE: &str = "gemini";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// [`ContentAnalyzer`] backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiApiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Builds a client from loaded secrets.
    ///
    /// The model is taken from `secret.json` when present, otherwise from
    /// `configured_model`, otherwise the default.
    pub fn from_secrets(secrets: &SecretConfig, configured_model: Option<&str>) -> Result<Self> {
        let gemini = secrets
            .gemini
            .as_ref()
            .filter(|g| !g.api_key.trim().is_empty())
            .ok_or_else(|| {
                GuardianError::config(
                    "Gemini API key not found (set GEMINI_API_KEY or gemini.api_key in secret.json)",
                )
            })?;

        let model = gemini
            .model_name
            .as_deref()
            .or(configured_model)
            .unwrap_or(DEFAULT_GEMINI_MODEL);

        Ok(Self::new(gemini.api_key.clone(), model))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the client at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        tracing::debug!(model = %self.model, turns = body.contents.len(), "Calling Gemini");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| request_error(SERVICE, err))?;

        let response = match ensure_success(SERVICE, response).await {
            Ok(response) => response,
            Err((status, body)) => return Err(map_http_error(SERVICE, status, &body)),
        };

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            GuardianError::upstream(SERVICE, format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::text("user", prompt)],
        };
        self.send_request(&request).await
    }
}

#[async_trait]
impl ContentAnalyzer for GeminiApiClient {
    async fn analyze_content(&self, content: &str, context: Option<&str>) -> Result<RiskAssessment> {
        let reply = self.generate(analysis_prompt(content, context)).await?;
        match parse_embedded::<RiskAssessment>(&reply)? {
            Some(assessment) => Ok(assessment),
            None => {
                tracing::debug!("Gemini analysis reply had no JSON object; using raw text");
                Ok(RiskAssessment::fallback(reply))
            }
        }
    }

    async fn detect_and_redact_pii(&self, text: &str) -> Result<RedactionResult> {
        let reply = self.generate(redaction_prompt(text)).await?;
        Ok(parse_embedded::<RedactionResult>(&reply)?
            .unwrap_or_else(|| RedactionResult::unchanged(text)))
    }

    async fn generate_suggestions(&self, prompt: &str, history: &[ChatMessage]) -> Result<String> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|message| {
                let role = match message.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                Content::text(role, message.text.clone())
            })
            .collect();
        contents.push(Content::text("user", prompt.to_string()));

        let request = GenerateContentRequest {
            contents,
        };
        self.send_request(&request).await
    }
}

pub(crate) fn analysis_prompt(content: &str, context: Option<&str>) -> String {
    let context = context.unwrap_or("General content analysis");
    format!(
        r#"You are an AI safety guardian analyzing content for potential risks.

Context: {context}

Content to analyze:
"{content}"

Analyze this content and identify:
1. Any Personally Identifiable Information (PII) like names, emails, phone numbers, addresses
2. Sensitive business information
3. Potential legal or compliance risks
4. Harmful or inappropriate content
5. Data that should be redacted or filtered

Provide your analysis in JSON format:
{{
  "content": "summary of the content",
  "riskLevel": "low|medium|high|critical",
  "flags": ["list of specific issues found"],
  "suggestions": ["list of recommendations"]
}}"#
    )
}

pub(crate) fn redaction_prompt(text: &str) -> String {
    format!(
        r#"Detect and redact all Personally Identifiable Information (PII) in the following text.
PII includes: names, email addresses, phone numbers, addresses, SSN, credit cards, etc.

Text:
"{text}"

Respond in JSON format:
{{
  "redactedText": "text with PII replaced by [REDACTED]",
  "detectedPII": ["list of PII types found"]
}}"#
    )
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: String) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.swap_remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            GuardianError::upstream(SERVICE, "Gemini API returned no text in the response candidates")
        })
}
