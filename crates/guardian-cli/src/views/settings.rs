use colored::Colorize;
use guardian_core::auth::Role;
use guardian_core::rate_limit::{Queue, RateLimits};
use guardian_core::session::Session;

use super::header;

const TOKEN_PREVIEW_LEN: usize = 20;

pub struct SettingsView<'a> {
    pub session: &'a Session,
    pub role: Role,
    pub kill_switch: bool,
    pub rate_limits: &'a RateLimits,
}

pub fn render(view: &SettingsView<'_>) -> String {
    let mut out = header("System Settings");

    match view.session.token_preview(TOKEN_PREVIEW_LEN) {
        Some(preview) => out.push_str(&format!(
            "{} {}\n",
            "🔒 JWT Authentication Active".green(),
            format!("{preview}...").dimmed()
        )),
        None => out.push_str(&format!("{}\n", "No session token".yellow())),
    }
    if let Some(email) = &view.session.email {
        out.push_str(&format!("   Signed in as {email}\n"));
    }
    if let Some(plan) = view.session.plan {
        out.push_str(&format!("   Plan: {}\n", plan.display_name()));
    }

    out.push_str(&format!(
        "\n{} {} {}\n",
        "Role:".bold(),
        view.role.to_string().to_uppercase().cyan().bold(),
        "(guardian role <admin|viewer|auditor>)".dimmed()
    ));
    if !view.role.is_admin() {
        out.push_str(&format!(
            "{}\n",
            format!(
                "You are currently in {} mode. Write access and critical controls are disabled.",
                view.role.to_string().to_uppercase()
            )
            .yellow()
        ));
    }

    let switch = if view.kill_switch {
        "ENGAGED".on_red().white().bold()
    } else {
        "off".green()
    };
    out.push_str(&format!("\n{} {}\n", "Kill Switch:".bold(), switch));
    if view.kill_switch {
        out.push_str(&format!(
            "{}\n",
            "SYSTEM LOCKDOWN ACTIVE. WORKERS PAUSED.".red()
        ));
    }

    out.push_str(&format!("\n{}\n", "API Rate Limits".bold()));
    for (label, queue) in [
        ("VIP Queue (Enterprise)", Queue::Vip),
        ("Standard Queue", Queue::Standard),
    ] {
        let bounds = queue.bounds();
        out.push_str(&format!(
            "  {:<24}{:>4} req/s  {}\n",
            label,
            view.rate_limits.get(queue),
            format!("(range {}-{})", bounds.start(), bounds.end()).dimmed()
        ));
    }
    out
}
