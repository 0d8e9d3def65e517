//! Error types for scheduler operations

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Start was requested with nothing selected
    #[error("Bitte wählen Sie mindestens einen Sound aus!")]
    EmptySelection,

    #[error("unknown sound '{id}'")]
    UnknownSound { id: String },

    #[error("no sound at catalog position {index}")]
    NoSuchEntry { index: usize },

    #[error("scheduler service is not running")]
    ServiceStopped,
}
