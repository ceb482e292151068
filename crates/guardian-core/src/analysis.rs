//! Generative analysis domain models and service trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

/// Structured risk assessment of a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Summary of the analysed content.
    pub content: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl RiskAssessment {
    /// Assessment used when the model answered without parseable JSON.
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self {
            content: raw.into(),
            risk_level: RiskLevel::Low,
            flags: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

/// Text with PII replaced by `[REDACTED]` and the PII categories found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionResult {
    pub redacted_text: String,
    #[serde(default, rename = "detectedPII")]
    pub detected_pii: Vec<String>,
}

impl RedactionResult {
    /// Result used when the model answered without parseable JSON.
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            redacted_text: text.into(),
            detected_pii: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of a suggestion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// Generative-analysis endpoint.
///
/// Calls are best effort: transport and API failures surface as
/// `GuardianError::Upstream` and are never retried.
#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    /// Assesses `content` for PII, sensitive business data, compliance risk and
    /// harmful content.
    async fn analyze_content(&self, content: &str, context: Option<&str>) -> Result<RiskAssessment>;

    /// Detects and redacts PII in `text`.
    async fn detect_and_redact_pii(&self, text: &str) -> Result<RedactionResult>;

    /// Continues a conversation with a free-form suggestion.
    async fn generate_suggestions(&self, prompt: &str, history: &[ChatMessage]) -> Result<String>;
}
