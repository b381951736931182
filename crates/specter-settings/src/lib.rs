//! # specter-settings
//!
//! Configuration management with layered sources for the Specter assistant.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`SpecterSettings::default()`]
//! 2. **User file** — `~/.specter/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `SPECTER_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use specter_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("idle timeout: {}s", settings.session.idle_timeout_secs);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{LoggingSettings, SessionSettings, SpecterSettings};

use std::sync::OnceLock;

/// Global settings singleton.
///
/// Initialized on first access via [`get_settings`]. Falls back to compiled
/// defaults if loading fails.
static SETTINGS: OnceLock<SpecterSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.specter/settings.json` with env
/// var overrides. On subsequent calls, returns the cached value.
pub fn get_settings() -> &'static SpecterSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
pub fn init_settings(settings: SpecterSettings) -> std::result::Result<(), SpecterSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
