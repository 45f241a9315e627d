//! Process-wide settings.

use serde::{Deserialize, Serialize};

/// Logging gates applied to every served request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Write a log entry at all
    #[serde(default = "default_true")]
    pub request: bool,
    /// Populate the response part of the log entry
    #[serde(default = "default_true")]
    pub response: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            request: true,
            response: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Singleton global configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
}
