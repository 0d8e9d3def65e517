//! Shared value types for AdS
//!
//! This crate contains the serializable types shared between the scheduler
//! core (ads-core) and any front end that renders its state (ads-cli).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Sound Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// One playable entry of the sound catalog.
///
/// Ids are not required to be unique; lookups resolve to the first match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundDescriptor {
    pub id: String,
    /// Display text shown in the sound list and in the play log
    pub name: String,
    /// Handle the player needs to render the sound (a file name relative to
    /// the configured sounds directory for the bundled player)
    pub resource: String,
}

impl SoundDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource: resource.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

pub const MAX_FREQUENCY_MINUTES: u8 = 60;
pub const MAX_VOLUME_PERCENT: u8 = 100;
pub const DEFAULT_FREQUENCY_MINUTES: u8 = 5;
pub const DEFAULT_VOLUME_PERCENT: u8 = 20;

/// User adjustable playback settings.
///
/// Values are always within `[0, 60]` minutes and `[0, 100]` percent.
/// Out of range input is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    frequency_minutes: u8,
    volume_percent: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frequency_minutes: DEFAULT_FREQUENCY_MINUTES,
            volume_percent: DEFAULT_VOLUME_PERCENT,
        }
    }
}

impl Settings {
    pub fn new(frequency_minutes: i64, volume_percent: i64) -> Self {
        Self {
            frequency_minutes: clamp_frequency(frequency_minutes),
            volume_percent: clamp_volume(volume_percent),
        }
    }

    /// Upper bound of the random delay between plays, in minutes
    pub fn frequency_minutes(&self) -> u8 {
        self.frequency_minutes
    }

    pub fn volume_percent(&self) -> u8 {
        self.volume_percent
    }

    /// Set the frequency, returning the clamped value that was stored
    pub fn set_frequency_minutes(&mut self, minutes: i64) -> u8 {
        self.frequency_minutes = clamp_frequency(minutes);
        self.frequency_minutes
    }

    /// Set the volume, returning the clamped value that was stored
    pub fn set_volume_percent(&mut self, percent: i64) -> u8 {
        self.volume_percent = clamp_volume(percent);
        self.volume_percent
    }

    /// Upper bound of the random delay between plays, in milliseconds
    pub fn max_delay_ms(&self) -> u64 {
        u64::from(self.frequency_minutes) * 60_000
    }
}

fn clamp_frequency(minutes: i64) -> u8 {
    minutes.clamp(0, i64::from(MAX_FREQUENCY_MINUTES)) as u8
}

fn clamp_volume(percent: i64) -> u8 {
    percent.clamp(0, i64::from(MAX_VOLUME_PERCENT)) as u8
}

// ─────────────────────────────────────────────────────────────────────────────
// Run State & Play Log
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the randomized playback cycle is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// Label of the single START/STOP control for this state
    pub fn control_label(&self) -> &'static str {
        match self {
            RunState::Idle => "START",
            RunState::Running => "STOP",
        }
    }
}

/// A single executed (non-test) play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Fixed UTC+8 wall time, formatted `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub sound_name: String,
}

/// Read-only view of the scheduler for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    pub run_state: RunState,
    /// Selected sound ids, in the order they were selected
    pub selection: Vec<String>,
    pub settings: Settings,
    /// Newest first
    pub log: Vec<LogEntry>,
    /// When the pending play will fire (UTC+8, same format as log entries)
    pub next_play_at: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk configuration.
///
/// Note: Persistence (load) is provided by ads-core via the `AdsConfigExt`
/// trait, as it requires platform-specific dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsConfig {
    /// Directory sound resources are resolved against
    #[serde(default)]
    pub sounds_dir: String,
    /// The sound catalog, in display order
    #[serde(default = "default_sounds")]
    pub sounds: Vec<SoundDescriptor>,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self::with_sounds_dir(String::new())
    }
}

impl AdsConfig {
    pub fn with_sounds_dir(sounds_dir: String) -> Self {
        Self {
            sounds_dir,
            sounds: default_sounds(),
        }
    }
}

/// The classroom catalog the tool ships with.
///
/// Ids `E` are shared by three entries; only the first of them is ever
/// resolved when playing by id. Test play by catalog position reaches all three.
pub fn default_sounds() -> Vec<SoundDescriptor> {
    vec![
        SoundDescriptor::new("A", "客艙服務鈴", "sound-a.mp3"),
        SoundDescriptor::new("B", "安全帶", "sound-b.mp3"),
        SoundDescriptor::new("C", "簡訊聲", "sound-c.mp3"),
        SoundDescriptor::new("D", "LINE聲響 1", "sound-d.mp3"),
        SoundDescriptor::new("E", "LINE聲響 2", "sound-e.mp3"),
        SoundDescriptor::new("E", "LINE聲響 3", "sound-f.mp3"),
        SoundDescriptor::new("E", "LINE聲響 4", "sound-g.mp3"),
    ]
}
