use colored::Colorize;
use guardian_core::review::ReviewQuery;
use guardian_core::task::{Task, TaskStatus, Tier};

use super::{header, truncate};

const SNIPPET_WIDTH: usize = 72;

/// Filtered review queue.
///
/// `total` is the unfiltered queue length; `read_only` hides the action hints
/// for roles that may not decide tasks.
pub fn render(query: &ReviewQuery, visible: &[Task], total: usize, read_only: bool) -> String {
    let mut out = header("Human-in-the-Loop Review");
    out.push_str(&format!(
        "{}\n",
        format!(
            "Filter: tier={} status={} risk={} sort={}",
            query.tier, query.status, query.risk, query.sort
        )
        .dimmed()
    ));
    out.push_str(&format!("{} Visible / {} Total\n\n", visible.len(), total));

    let borrowed: Vec<&Task> = visible.iter().collect();
    if query.shows_priority_upsell(&borrowed) {
        out.push_str(&format!(
            "{}\n{}\n\n",
            "⚠ High Latency Detected on Standard Queue".yellow().bold(),
            "Standard tasks wait 1.2s. VIP tasks are processing in 12ms. Upgrade to Priority."
                .yellow()
        ));
    }

    if visible.is_empty() {
        out.push_str(&format!("{}\n", "No tasks match the current filters.".dimmed()));
        return out;
    }

    for task in visible {
        out.push_str(&render_task(task, read_only));
        out.push('\n');
    }

    if read_only {
        out.push_str(&format!("{}\n", "Read-only mode".dimmed()));
    }
    out
}

fn render_task(task: &Task, read_only: bool) -> String {
    let status = match task.status {
        TaskStatus::Pending => "PENDING".yellow().bold(),
        TaskStatus::Approved => "APPROVED".green().bold(),
        TaskStatus::Rejected => "REJECTED".red().bold(),
    };
    let tier = match task.tier {
        Tier::Enterprise => "ENTERPRISE".magenta(),
        Tier::Standard => "STANDARD".normal(),
    };

    let mut out = format!(
        "{} {} {} {}\n",
        task.id.bold(),
        status,
        tier,
        task.client_id.dimmed()
    );
    let risk = if task.risk_flag {
        "  ⚠ Risk Detected".red().to_string()
    } else {
        String::new()
    };
    out.push_str(&format!(
        "  AI Confidence: {}%{}  {}\n",
        task.confidence,
        risk,
        task.timestamp.format("%Y-%m-%d %H:%M UTC").to_string().dimmed()
    ));
    out.push_str(&format!("  User Input: {}\n", truncate(&task.input, SNIPPET_WIDTH)));
    out.push_str(&format!("  AI Draft:   {}\n", truncate(&task.ai_draft, SNIPPET_WIDTH)));

    if task.is_pending() && !read_only {
        out.push_str(&format!(
            "  {}\n",
            format!(
                "guardian approve {id} [--text <edit>] | guardian reject {id}",
                id = task.id
            )
            .cyan()
        ));
    }
    out
}
