use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Screen shown behind the session and wizard gates.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ActiveView {
    #[default]
    Dashboard,
    Reviews,
    GhostReports,
    Settings,
}

impl ActiveView {
    pub fn title(self) -> &'static str {
        match self {
            ActiveView::Dashboard => "Dashboard Console",
            ActiveView::Reviews => "Reviews Console",
            ActiveView::GhostReports => "Ghost Audit Logs",
            ActiveView::Settings => "Settings Console",
        }
    }
}
