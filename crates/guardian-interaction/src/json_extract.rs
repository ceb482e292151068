//! Pulls a JSON object out of free-form model output.

use serde::de::DeserializeOwned;

use guardian_core::error::Result;

/// Returns the widest `{...}` span in `text`, if any: first `{` through last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    // A `}` before the first `{` is not a span
    (end > start).then(|| &text[start..=end])
}

/// Parses the embedded JSON object.
///
/// - `Ok(Some(_))`: an object was found and parsed
/// - `Ok(None)`: the text contains no `{...}` span
/// - `Err`: a span was found but is not valid JSON for `T`
pub fn parse_embedded<T: DeserializeOwned>(text: &str) -> Result<Option<T>> {
    match extract_json_object(text) {
        Some(span) => Ok(Some(serde_json::from_str(span)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::analysis::{RiskAssessment, RiskLevel};

    #[test]
    fn test_extracts_object_from_markdown_fence() {
        let reply = "Here you go:\n```json\n{\n  \"content\": \"an email\",\n  \"riskLevel\": \"high\",\n  \"flags\": [\"email address\"],\n  \"suggestions\": []\n}\n```\nLet me know!";

        let parsed: RiskAssessment = parse_embedded(reply).unwrap().unwrap();

        assert_eq!(parsed.risk_level, RiskLevel::High);
        assert_eq!(parsed.flags, vec!["email address"]);
    }

    #[test]
    fn test_span_runs_to_last_brace() {
        assert_eq!(extract_json_object("a {x} b {y} c"), Some("{x} b {y}"));
    }

    #[test]
    fn test_nested_object_across_lines() {
        let reply = "Result:\n{\n  \"a\": {\"b\": 1}\n}\ndone";
        assert_eq!(extract_json_object(reply), Some("{\n  \"a\": {\"b\": 1}\n}"));
    }

    #[test]
    fn test_closing_brace_before_opening_is_none() {
        assert_eq!(extract_json_object("} nothing here {"), None);
        assert_eq!(extract_json_object("{}"), Some("{}"));
    }

    #[test]
    fn test_no_object_is_none() {
        let parsed: Option<RiskAssessment> = parse_embedded("Looks safe to me.").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_malformed_object_is_error() {
        let result: Result<Option<RiskAssessment>> = parse_embedded("{ nope }");
        assert!(result.is_err());
    }
}
