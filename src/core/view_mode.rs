use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BytedogError;

/// Display granularity of the front end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Minimal,
    Compact,
    Detailed,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Minimal, ViewMode::Compact, ViewMode::Detailed];

    pub fn next(self) -> Self {
        match self {
            ViewMode::Minimal => ViewMode::Compact,
            ViewMode::Compact => ViewMode::Detailed,
            ViewMode::Detailed => ViewMode::Minimal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Minimal => "minimal",
            ViewMode::Compact => "compact",
            ViewMode::Detailed => "detailed",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = BytedogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(ViewMode::Minimal),
            "compact" => Ok(ViewMode::Compact),
            "detailed" => Ok(ViewMode::Detailed),
            other => Err(BytedogError::config(format!(
                "unknown view mode '{}' (expected minimal, compact or detailed)",
                other
            ))),
        }
    }
}

/// Holds the current view mode; changing it has no other effect
#[derive(Debug, Clone, Default)]
pub struct ViewModeController {
    current: ViewMode,
}

impl ViewModeController {
    pub fn new(initial: ViewMode) -> Self {
        Self { current: initial }
    }

    /// Advance to the next mode and return it
    pub fn cycle(&mut self) -> ViewMode {
        self.current = self.current.next();
        log::debug!("View mode switched to {}", self.current);
        self.current
    }

    pub fn set(&mut self, mode: ViewMode) {
        self.current = mode;
    }

    pub fn current(&self) -> ViewMode {
        self.current
    }
}
