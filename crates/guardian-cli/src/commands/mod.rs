pub mod analyze;
pub mod console;
pub mod context;
pub mod control;
pub mod session;
pub mod simulate;

use anyhow::Result;
use guardian_core::GuardianError;
use guardian_core::store::CommandOutcome;

use crate::views;
pub use context::AppContext;

/// Prints the paywall or the wizard notice when the console is locked.
///
/// Returns whether the caller may render a console screen.
pub async fn console_unlocked(ctx: &AppContext) -> bool {
    let (authenticated, wizard_done) = ctx
        .store
        .store()
        .read(|s| (s.is_authenticated(), s.has_completed_wizard()))
        .await;

    if !authenticated {
        print!("{}", views::paywall::render());
        return false;
    }
    if !wizard_done {
        print!("{}", views::wizard::pending_notice());
        return false;
    }
    true
}

/// Like [`console_unlocked`] but only requires a session.
pub async fn session_present(ctx: &AppContext) -> bool {
    let authenticated = ctx.store.store().read(|s| s.is_authenticated()).await;
    if !authenticated {
        print!("{}", views::paywall::render());
    }
    authenticated
}

/// Turns a denied outcome into an error so the process exits non-zero.
pub fn ensure_allowed(outcome: CommandOutcome) -> Result<CommandOutcome> {
    match outcome {
        CommandOutcome::Denied(denied) => Err(GuardianError::from(denied).into()),
        other => Ok(other),
    }
}
