//! Error types for context operations

use thiserror::Error;

/// Errors during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("invalid sound catalog: {reason}")]
    InvalidCatalog { reason: String },
}
