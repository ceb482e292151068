use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use guardian_core::review::ReviewQuery;
use guardian_core::view::ActiveView;
use guardian_execution::{RandomEventSource, SimulationDriver};
use tokio_util::sync::CancellationToken;

use super::{AppContext, console, console_unlocked};

/// Runs the live feed until `duration` elapses or Ctrl-C.
pub async fn run(ctx: &AppContext, duration: Option<u64>, seed: Option<u64>) -> Result<()> {
    if !console_unlocked(ctx).await {
        return Ok(());
    }

    let source = match seed {
        Some(seed) => RandomEventSource::seeded(seed),
        None => RandomEventSource::new(),
    };
    let driver = SimulationDriver::new(Arc::clone(&ctx.store), source, &ctx.config.simulation);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(driver.run(cancel.clone()));

    let until = match duration {
        Some(secs) => format!("for {secs}s"),
        None => "until Ctrl-C".to_string(),
    };
    println!("{}", format!("▶ Live simulation running {until}...").cyan());
    if ctx.store.store().kill_switch().await {
        println!(
            "{}",
            "Kill switch is engaged; no events will arrive until it is released.".yellow()
        );
    }

    match duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                signal = tokio::signal::ctrl_c() => signal.context("Failed to listen for Ctrl-C")?,
            }
        }
        None => tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?,
    }

    cancel.cancel();
    let report = handle.await.context("Simulation driver stopped unexpectedly")?;
    println!(
        "{}",
        format!(
            "■ Stopped after {} stats ticks and {} task ticks ({} events applied)",
            report.stats_ticks, report.task_ticks, report.events_applied
        )
        .cyan()
    );

    console::show(ctx, ActiveView::Dashboard, &ReviewQuery::default()).await
}
