//! Console controls.

use anyhow::Result;
use colored::Colorize;
use guardian_core::rate_limit::Queue;
use guardian_core::store::Command;

use super::{AppContext, console_unlocked, ensure_allowed};

pub async fn kill_switch(ctx: &AppContext, engage: bool) -> Result<()> {
    if !console_unlocked(ctx).await {
        return Ok(());
    }
    let outcome = ensure_allowed(ctx.store.execute(Command::SetKillSwitch(engage)).await?)?;

    if !outcome.is_applied() {
        let state = if engage { "engaged" } else { "released" };
        println!("{}", format!("Kill switch already {state}.").dimmed());
    } else if engage {
        println!(
            "{}",
            "⛔ Kill switch engaged. All simulated workers are halted.".red().bold()
        );
    } else {
        println!("{}", "✅ Kill switch released. Workers resuming.".green());
    }
    Ok(())
}

pub async fn rate_limit(ctx: &AppContext, queue: Queue, value: u32) -> Result<()> {
    if !console_unlocked(ctx).await {
        return Ok(());
    }
    ensure_allowed(
        ctx.store
            .execute(Command::SetRateLimit { queue, value })
            .await?,
    )?;

    let stored = ctx.store.store().read(|s| s.rate_limits().get(queue)).await;
    println!(
        "{}",
        format!("{queue} queue limit: {stored} req/s").green()
    );
    if stored != value {
        let bounds = queue.bounds();
        println!(
            "{}",
            format!(
                "Requested {value} is outside {}-{}; clamped.",
                bounds.start(),
                bounds.end()
            )
            .yellow()
        );
    }
    Ok(())
}

pub async fn reset_stats(ctx: &AppContext) -> Result<()> {
    if !console_unlocked(ctx).await {
        return Ok(());
    }
    ctx.store.execute(Command::ResetStats).await?;
    println!("{}", "Dashboard counters restored to their defaults.".green());
    Ok(())
}
