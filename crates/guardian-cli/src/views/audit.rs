use colored::Colorize;
use guardian_core::audit::{AuditLog, total_saved_liability};

use super::{header, money, truncate};

pub fn render(logs: &[AuditLog]) -> String {
    let mut out = header("Shadow Mode Analysis (Last 7 Days)");
    out.push_str(&format!(
        "{}\n",
        format!(
            "{:<12}{:<28}{:<22}{:<20}{:>10}",
            "Date", "Task Snippet", "Risk Detected", "Outcome", "Liability"
        )
        .dimmed()
    ));

    for log in logs {
        let outcome = if log.outcome.contains("Human") {
            log.outcome.yellow()
        } else {
            log.outcome.green()
        };
        out.push_str(&format!(
            "{:<12}{:<28}{:<22}{:<20}{:>10}\n",
            log.date,
            truncate(&log.task_snippet, 26),
            log.risk_detected.red(),
            outcome,
            money(log.saved_liability),
        ));
    }

    out.push_str(&format!(
        "\n{} {}\n",
        "Total Risk Avoided:".bold(),
        money(total_saved_liability(logs)).green().bold()
    ));
    out
}
