use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::errors::SessionError;
use crate::events::ErrorSeverity;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Delay before the swap overlay is restored after a departure or close.
    #[serde(default = "default_revert_delay_ms")]
    pub revert_delay_ms: u64,
    #[serde(default = "default_volume_interval_ms")]
    pub volume_indication_interval_ms: u32,
    #[serde(default = "default_volume_smooth")]
    pub volume_indication_smooth: u32,
    /// Engine error codes that end the session.
    #[serde(default = "default_fatal_error_codes")]
    pub fatal_error_codes: Vec<i32>,
}

fn default_revert_delay_ms() -> u64 {
    500
}

fn default_volume_interval_ms() -> u32 {
    500
}

fn default_volume_smooth() -> u32 {
    3
}

fn default_fatal_error_codes() -> Vec<i32> {
    vec![17]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            revert_delay_ms: default_revert_delay_ms(),
            volume_indication_interval_ms: default_volume_interval_ms(),
            volume_indication_smooth: default_volume_smooth(),
            fatal_error_codes: default_fatal_error_codes(),
        }
    }
}

impl SessionConfig {
    /// Load from a JSON file. Missing or unreadable files yield defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("ignoring corrupt session config {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Strict variant of [`SessionConfig::load`] for hosts that want to fail fast.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        serde_json::from_str(json).map_err(|e| SessionError::Config(e.to_string()))
    }

    pub fn revert_delay(&self) -> Duration {
        Duration::from_millis(self.revert_delay_ms)
    }

    pub fn classify_error(&self, code: i32) -> ErrorSeverity {
        if self.fatal_error_codes.contains(&code) {
            ErrorSeverity::Fatal
        } else {
            ErrorSeverity::Transient
        }
    }
}
