mod config;
mod error;

pub use config::{AdsConfig, AdsConfigExt, default_sounds_dir};
pub use error::ConfigError;
