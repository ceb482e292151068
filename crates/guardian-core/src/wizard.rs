//! Onboarding wizard.
//!
//! Three steps shown once after login. Finishing the last step, or skipping,
//! completes the wizard; the caller then records that on the store with
//! `Command::CompleteWizard`.

use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum WizardStep {
    #[default]
    Initialization,
    Configuration,
    Finalization,
}

impl WizardStep {
    pub const COUNT: u8 = 3;

    /// 1-based position of the step.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Initialization => 1,
            WizardStep::Configuration => 2,
            WizardStep::Finalization => 3,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            WizardStep::Initialization => Some(WizardStep::Configuration),
            WizardStep::Configuration => Some(WizardStep::Finalization),
            WizardStep::Finalization => None,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            WizardStep::Initialization => "Welcome to the Guardian interface",
            WizardStep::Configuration => "Configure your oversight policy",
            WizardStep::Finalization => "Your dashboard is live",
        }
    }

    pub fn checklist(self) -> &'static [&'static str] {
        match self {
            WizardStep::Initialization => &[
                "Establishing secure websocket tunnel...",
                "Verifying regional compliance (US-EAST-1)...",
                "Loading baseline hallucination models...",
            ],
            WizardStep::Configuration => &[
                "Connect LLM providers",
                "Select output channels",
                "Choose risk sensitivity (Permissive / Balanced / Strict)",
            ],
            WizardStep::Finalization => &[
                "3 optimization opportunities identified",
                "Enable the priority queue",
                "Turn on ghost audit reports",
            ],
        }
    }
}

/// Result of advancing the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardProgress {
    Advanced(WizardStep),
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct SetupWizard {
    step: WizardStep,
}

impl SetupWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn progress_percent(&self) -> u8 {
        self.step.number() * 100 / WizardStep::COUNT
    }

    pub fn next(&mut self) -> WizardProgress {
        match self.step.next() {
            Some(step) => {
                self.step = step;
                WizardProgress::Advanced(step)
            }
            None => WizardProgress::Completed,
        }
    }

    pub fn skip(&mut self) -> WizardProgress {
        self.step = WizardStep::Finalization;
        WizardProgress::Completed
    }
}
