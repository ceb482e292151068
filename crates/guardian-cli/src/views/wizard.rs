use colored::Colorize;
use guardian_core::wizard::SetupWizard;

const BAR_WIDTH: usize = 24;

/// One onboarding step with its progress bar.
pub fn render(wizard: &SetupWizard) -> String {
    let step = wizard.step();
    let percent = wizard.progress_percent() as usize;
    let filled = BAR_WIDTH * percent / 100;

    let mut out = format!(
        "{} {}\n",
        format!("Step {} of 3", step.number()).bright_magenta().bold(),
        format!("[{}{}] {percent}%", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled)).dimmed(),
    );
    out.push_str(&format!("{}\n", step.headline().bold()));
    for item in step.checklist() {
        out.push_str(&format!("  {} {item}\n", "✓".green()));
    }
    out
}

/// Printed when a console screen is requested before onboarding finished.
pub fn pending_notice() -> String {
    format!(
        "{}\n{}\n",
        "Setup is not finished yet.".yellow().bold(),
        "Run `guardian wizard` to initialize the Guardian node (or `guardian wizard --skip`).".dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step() {
        let wizard = SetupWizard::new();
        let out = render(&wizard);
        assert!(out.contains("Step 1 of 3"));
        assert!(out.contains("33%"));
        assert!(out.contains("Establishing secure websocket tunnel..."));
    }

    #[test]
    fn test_last_step_is_full() {
        let mut wizard = SetupWizard::new();
        wizard.next();
        wizard.next();
        let out = render(&wizard);
        assert!(out.contains("Step 3 of 3"));
        assert!(out.contains("100%"));
        assert!(!out.contains('░'));
    }
}
