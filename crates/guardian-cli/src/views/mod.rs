//! Terminal renderers.
//!
//! Every view is a plain function from store slices to a `String`. Views never
//! touch the store themselves; the command layer reads what they need and
//! prints the result.

pub mod analysis;
pub mod audit;
pub mod dashboard;
pub mod paywall;
pub mod review;
pub mod settings;
pub mod wizard;

use colored::Colorize;

/// Section title with an underline of the same width.
pub(crate) fn header(title: &str) -> String {
    format!(
        "{}\n{}\n",
        title.bright_cyan().bold(),
        "─".repeat(title.chars().count()).dimmed()
    )
}

/// Dollar amount with thousands separators, e.g. `$18,600`.
pub(crate) fn money(amount: u64) -> String {
    format!("${}", thousands(amount))
}

pub(crate) fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Cuts `text` to `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
