//! Application configuration
//!
//! This module re-exports the shared config type from ads-types and
//! provides platform-specific defaults and loading for it. Configuration
//! is startup input only; nothing the user changes at runtime is written
//! back.

use std::path::PathBuf;

pub use ads_types::AdsConfig;

use super::ConfigError;

const APP_NAME: &str = "ads";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// `<data dir>/ads/sounds`, e.g. `~/.local/share/ads/sounds` on Linux
pub fn default_sounds_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join(APP_NAME).join("sounds"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// AdsConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AdsConfig loading and path resolution
pub trait AdsConfigExt: Sized {
    fn load() -> Result<Self, ConfigError>;
    fn load_with_defaults() -> Self;
    fn config_path() -> Option<PathBuf>;
    fn sounds_path(&self) -> PathBuf;
}

impl AdsConfigExt for AdsConfig {
    /// Load from the confy config file, writing defaults if none exists
    fn load() -> Result<Self, ConfigError> {
        let mut config: AdsConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        if config.sounds_dir.is_empty() {
            config.sounds_dir = default_sounds_dir();
        }
        Ok(config)
    }

    /// Defaults used when no config file can be read
    fn load_with_defaults() -> Self {
        AdsConfig::with_sounds_dir(default_sounds_dir())
    }

    fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }

    fn sounds_path(&self) -> PathBuf {
        PathBuf::from(&self.sounds_dir)
    }
}
