use colored::Colorize;
use guardian_core::rate_limit::RateLimits;
use guardian_core::session::Plan;
use guardian_core::stats::Stats;

use super::{header, money, thousands};

/// What the dashboard needs from the store.
pub struct DashboardView<'a> {
    pub stats: &'a Stats,
    pub kill_switch: bool,
    pub rate_limits: &'a RateLimits,
    pub plan: Option<Plan>,
    pub pending_reviews: usize,
}

pub fn render(view: &DashboardView<'_>) -> String {
    let mut out = header("Dashboard Console");

    if view.kill_switch {
        out.push_str(&format!(
            "{}\n\n",
            "⛔ SYSTEM LOCKDOWN ACTIVE. WORKERS PAUSED.".on_red().white().bold()
        ));
    }

    let stats = view.stats;
    let cards = [
        ("Total Runs", thousands(stats.total_runs)),
        ("Risks Caught", thousands(stats.risks_caught)),
        ("Money Saved", money(stats.money_saved)),
        ("Active Workers", stats.active_workers.to_string()),
    ];
    for (label, value) in cards {
        out.push_str(&format!("  {:<16}{}\n", label.dimmed(), value.bold()));
    }

    out.push('\n');
    let vip_label = if view.plan == Some(Plan::Enterprise) {
        "VIP Queue".green()
    } else {
        "VIP Queue (Enterprise Only)".yellow()
    };
    out.push_str(&format!(
        "  {}  {} req/s\n",
        vip_label,
        view.rate_limits.vip
    ));
    out.push_str(&format!(
        "  {}  {} req/s\n",
        "Standard Queue".normal(),
        view.rate_limits.standard
    ));

    out.push('\n');
    if view.pending_reviews > 0 {
        out.push_str(&format!(
            "{}\n",
            format!("{} task(s) awaiting review: guardian review", view.pending_reviews).yellow()
        ));
    } else {
        out.push_str(&format!("{}\n", "Review queue is clear.".green()));
    }
    out
}
