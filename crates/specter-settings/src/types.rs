//! Settings schema with compiled defaults.

use serde::{Deserialize, Serialize};

/// Top-level settings for the Specter assistant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecterSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Session lifecycle knobs.
    pub session: SessionSettings,
    /// Logging knobs.
    pub logging: LoggingSettings,
}

impl Default for SpecterSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_owned(),
            name: "specter".to_owned(),
            session: SessionSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Session lifecycle settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Seconds without an accepted event before a session terminates itself.
    pub idle_timeout_secs: u64,
    /// Capacity of the per-session interaction event channel.
    pub event_buffer: usize,
    /// Evidence limit a fresh session starts with.
    pub default_evidence_limit: u8,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 300,
            event_buffer: 64,
            default_evidence_limit: 3,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level for the tracing subscriber when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
