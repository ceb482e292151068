use colored::Colorize;
use guardian_core::analysis::{RedactionResult, RiskAssessment, RiskLevel};

use super::header;

pub fn render_assessment(assessment: &RiskAssessment) -> String {
    let level = assessment.risk_level.to_string().to_uppercase();
    let level = match assessment.risk_level {
        RiskLevel::Low => level.green().bold(),
        RiskLevel::Medium => level.yellow().bold(),
        RiskLevel::High | RiskLevel::Critical => level.red().bold(),
    };

    let mut out = header("Risk Analysis");
    out.push_str(&format!("{} {}\n\n", "Risk Level:".bold(), level));
    out.push_str(&format!("{}\n", assessment.content));

    if !assessment.flags.is_empty() {
        out.push_str(&format!("\n{}\n", "Flags".bold()));
        for flag in &assessment.flags {
            out.push_str(&format!("  {} {flag}\n", "⚑".red()));
        }
    }
    if !assessment.suggestions.is_empty() {
        out.push_str(&format!("\n{}\n", "Suggestions".bold()));
        for suggestion in &assessment.suggestions {
            out.push_str(&format!("  → {suggestion}\n"));
        }
    }
    out
}

pub fn render_redaction(result: &RedactionResult) -> String {
    let mut out = header("PII Redaction");
    out.push_str(&format!("{}\n", result.redacted_text));
    if result.detected_pii.is_empty() {
        out.push_str(&format!("\n{}\n", "No PII detected.".green()));
    } else {
        out.push_str(&format!(
            "\n{} {}\n",
            "Detected:".bold(),
            result.detected_pii.join(", ").yellow()
        ));
    }
    out
}
