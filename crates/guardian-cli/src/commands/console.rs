//! Console screens and review decisions.

use anyhow::{Context, Result};
use colored::Colorize;
use guardian_core::review::ReviewQuery;
use guardian_core::store::{Command, CommandOutcome};
use guardian_core::view::ActiveView;

use super::{AppContext, console_unlocked, ensure_allowed};
use crate::views::dashboard::{self, DashboardView};
use crate::views::settings::{self, SettingsView};
use crate::views::{audit, review};

/// Renders the active view.
pub async fn current(ctx: &AppContext) -> Result<()> {
    let view = ctx.store.store().read(|s| s.active_view()).await;
    show(ctx, view, &ReviewQuery::default()).await
}

/// Opens `view`, remembering it as the active view.
pub async fn show(ctx: &AppContext, view: ActiveView, query: &ReviewQuery) -> Result<()> {
    if !console_unlocked(ctx).await {
        return Ok(());
    }
    ctx.store
        .execute(Command::SetActiveView(view))
        .await
        .context("Failed to save active view")?;

    let shared = ctx.store.store();
    let out = match view {
        ActiveView::Dashboard => {
            shared
                .read(|s| {
                    dashboard::render(&DashboardView {
                        stats: s.stats(),
                        kill_switch: s.kill_switch(),
                        rate_limits: s.rate_limits(),
                        plan: s.session().plan,
                        pending_reviews: s.tasks().iter().filter(|t| t.is_pending()).count(),
                    })
                })
                .await
        }
        ActiveView::Reviews => {
            let (visible, total) = ctx.reviews.queue(query).await;
            let read_only = !shared.read(|s| s.user_role().is_admin()).await;
            review::render(query, &visible, total, read_only)
        }
        ActiveView::GhostReports => shared.read(|s| audit::render(s.audit_logs())).await,
        ActiveView::Settings => {
            shared
                .read(|s| {
                    settings::render(&SettingsView {
                        session: s.session(),
                        role: s.user_role(),
                        kill_switch: s.kill_switch(),
                        rate_limits: s.rate_limits(),
                    })
                })
                .await
        }
    };

    let role = shared.read(|s| s.user_role()).await;
    println!(
        "{}",
        format!("Myers Guardian › {} [{}]", view.title(), role.badge()).dimmed()
    );
    print!("{out}");
    Ok(())
}

pub async fn approve(ctx: &AppContext, id: &str, new_text: Option<String>) -> Result<()> {
    if !console_unlocked(ctx).await {
        return Ok(());
    }
    let outcome = ctx
        .reviews
        .approve(id, new_text)
        .await
        .with_context(|| format!("Failed to approve task '{id}'"))?;
    report_decision(ensure_allowed(outcome)?, id, "Approved");
    Ok(())
}

pub async fn reject(ctx: &AppContext, id: &str) -> Result<()> {
    if !console_unlocked(ctx).await {
        return Ok(());
    }
    let outcome = ctx
        .reviews
        .reject(id)
        .await
        .with_context(|| format!("Failed to reject task '{id}'"))?;
    report_decision(ensure_allowed(outcome)?, id, "Rejected");
    Ok(())
}

fn report_decision(outcome: CommandOutcome, id: &str, verb: &str) {
    if outcome.is_applied() {
        println!("{}", format!("✅ {verb} {id}").green());
    } else {
        println!(
            "{}",
            format!("Task '{id}' does not exist or has already been decided.").yellow()
        );
    }
}
