pub mod catalog;
pub mod clock;
pub mod context;
pub mod play_log;
pub mod player;
pub mod scheduler;
pub mod service;

// Re-exports for convenience
pub use ads_types::{LogEntry, RunState, SchedulerSnapshot, Settings, SoundDescriptor};
pub use catalog::SoundCatalog;
pub use clock::{Clock, SystemClock};
pub use context::{AdsConfig, AdsConfigExt, ConfigError};
pub use play_log::{PLAY_LOG_CAPACITY, PlayLog, format_utc8};
pub use player::Player;
pub use scheduler::{PendingPlay, Scheduler, SchedulerError, Selection, TimerId};
pub use service::{
    EventSender, SchedulerEvent, SchedulerHandle, SchedulerService, create_event_channel,
};
