//! Generative analysis commands.
//!
//! These talk to the analysis endpoint only; they never touch the store.

use anyhow::{Context, Result};
use guardian_core::analysis::ContentAnalyzer;
use guardian_interaction::GeminiApiClient;

use super::AppContext;
use crate::views::analysis;

fn analyzer(ctx: &AppContext) -> Result<GeminiApiClient> {
    let client = GeminiApiClient::from_secrets(&ctx.secrets, Some(&ctx.config.gemini.model))?;
    tracing::debug!(model = client.model(), "Analysis client ready");
    Ok(client)
}

pub async fn analyze(ctx: &AppContext, content: &str, context: Option<&str>) -> Result<()> {
    let assessment = analyzer(ctx)?
        .analyze_content(content, context)
        .await
        .context("Risk analysis failed")?;
    print!("{}", analysis::render_assessment(&assessment));
    Ok(())
}

pub async fn redact(ctx: &AppContext, text: &str) -> Result<()> {
    let result = analyzer(ctx)?
        .detect_and_redact_pii(text)
        .await
        .context("PII redaction failed")?;
    print!("{}", analysis::render_redaction(&result));
    Ok(())
}

pub async fn suggest(ctx: &AppContext, prompt: &str) -> Result<()> {
    let reply = analyzer(ctx)?
        .generate_suggestions(prompt, &[])
        .await
        .context("Suggestion request failed")?;
    println!("{reply}");
    Ok(())
}
