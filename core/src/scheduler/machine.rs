//! Scheduler state machine
//!
//! Owns selection, settings, run state, the pending timer and the play
//! log. All mutation goes through the operations below. The scheduler
//! never sleeps itself: a driver (see `crate::service`) waits for the
//! pending play and calls back into `on_timer`.
//!
//! # Lifecycle
//!
//! 1. `start` with a non-empty selection → `Running`, first timer armed
//! 2. Timer fires → random sound played and logged → timer re-armed
//! 3. `stop` → timer cancelled, log cleared → `Idle`

use std::time::Duration;

use ads_types::{LogEntry, RunState, SchedulerSnapshot, Settings};
use chrono::DateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{PendingPlay, SchedulerError, Selection, TimerId};
use crate::catalog::SoundCatalog;
use crate::clock::{Clock, SystemClock};
use crate::play_log::{PlayLog, format_utc8};
use crate::player::Player;

pub struct Scheduler<P, R = StdRng, C = SystemClock> {
    catalog: SoundCatalog,
    player: P,
    rng: R,
    clock: C,

    selection: Selection,
    settings: Settings,
    run_state: RunState,

    /// Exists only while running with a non-empty selection
    pending: Option<PendingPlay>,
    next_timer_id: u64,

    log: PlayLog,
}

impl<P: Player> Scheduler<P> {
    /// Create a scheduler using OS entropy and the system clock
    pub fn new(catalog: SoundCatalog, player: P) -> Self {
        Self::with_parts(catalog, player, StdRng::from_entropy(), SystemClock)
    }
}

impl<P: Player, R: Rng, C: Clock> Scheduler<P, R, C> {
    pub fn with_parts(catalog: SoundCatalog, player: P, rng: R, clock: C) -> Self {
        Self {
            catalog,
            player,
            rng,
            clock,
            selection: Selection::default(),
            settings: Settings::default(),
            run_state: RunState::Idle,
            pending: None,
            next_timer_id: 0,
            log: PlayLog::new(),
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn pending(&self) -> Option<PendingPlay> {
        self.pending
    }

    pub fn log(&self) -> &PlayLog {
        &self.log
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            run_state: self.run_state,
            selection: self.selection.to_vec(),
            settings: self.settings,
            log: self.log.to_vec(),
            next_play_at: self
                .pending
                .and_then(|p| DateTime::from_timestamp_millis(p.fire_at_epoch_millis))
                .map(format_utc8),
        }
    }

    // ─── Selection ──────────────────────────────────────────────────────────

    /// Flip membership of `id` in the selection. Returns true if now selected.
    pub fn toggle_sound(&mut self, id: &str) -> bool {
        let selected = self.selection.toggle(id);
        tracing::debug!(sound_id = id, selected, "Toggled sound");
        self.rearm_if_running();
        selected
    }

    /// Clear the selection. Does not stop a running cycle.
    pub fn reset_selection(&mut self) {
        self.selection.clear();
        tracing::debug!("Selection reset");
        self.rearm_if_running();
    }

    // ─── Settings ───────────────────────────────────────────────────────────

    /// Set the maximum period in minutes, clamped to [0, 60]
    pub fn set_frequency(&mut self, minutes: i64) -> u8 {
        let stored = self.settings.set_frequency_minutes(minutes);
        tracing::debug!(frequency_minutes = stored, "Frequency set");
        self.rearm_if_running();
        stored
    }

    /// Set the playback volume in percent, clamped to [0, 100]
    pub fn set_volume(&mut self, percent: i64) -> u8 {
        let stored = self.settings.set_volume_percent(percent);
        tracing::debug!(volume_percent = stored, "Volume set");
        self.rearm_if_running();
        stored
    }

    pub fn reset_settings(&mut self) {
        self.settings = Settings::default();
        tracing::debug!("Settings reset");
        self.rearm_if_running();
    }

    // ─── Playback ───────────────────────────────────────────────────────────

    /// Play a sound right away at the current volume, outside the cycle.
    /// Not logged.
    pub fn test_play(&self, id: &str) -> Result<(), SchedulerError> {
        let sound = self
            .catalog
            .find(id)
            .ok_or_else(|| SchedulerError::UnknownSound { id: id.to_string() })?;
        tracing::debug!(sound_id = id, "Test play");
        self.player.play(sound, self.settings.volume_percent());
        Ok(())
    }

    /// Like `test_play`, but addresses the catalog entry at `index`, so
    /// entries sharing an id can each be heard
    pub fn test_play_entry(&self, index: usize) -> Result<(), SchedulerError> {
        let sound = self
            .catalog
            .get(index)
            .ok_or(SchedulerError::NoSuchEntry { index })?;
        tracing::debug!(index, sound_id = %sound.id, resource = %sound.resource, "Test play");
        self.player.play(sound, self.settings.volume_percent());
        Ok(())
    }

    // ─── Run State ──────────────────────────────────────────────────────────

    /// Enter `Running` and arm the first timer. No-op if already running.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.run_state.is_running() {
            return Ok(());
        }
        if self.selection.is_empty() {
            tracing::warn!("Start requested with empty selection");
            return Err(SchedulerError::EmptySelection);
        }

        self.run_state = RunState::Running;
        tracing::info!(
            selected = self.selection.len(),
            frequency_minutes = self.settings.frequency_minutes(),
            "Scheduler started"
        );
        self.rearm();
        Ok(())
    }

    /// Cancel the pending timer, clear the log and return to `Idle`
    pub fn stop(&mut self) {
        self.pending = None;
        let was_running = self.run_state.is_running();
        self.run_state = RunState::Idle;
        self.log.clear();
        if was_running {
            tracing::info!("Scheduler stopped");
        }
    }

    /// Start when idle, stop when running. Returns the resulting state.
    pub fn toggle_run(&mut self) -> Result<RunState, SchedulerError> {
        if self.run_state.is_running() {
            self.stop();
        } else {
            self.start()?;
        }
        Ok(self.run_state)
    }

    // ─── Timer ──────────────────────────────────────────────────────────────

    /// Handle expiry of timer `id`.
    ///
    /// Only the currently pending timer may fire, and only while running;
    /// anything else is a stale fire and does nothing. Returns the log entry
    /// written, if a sound was played.
    pub fn on_timer(&mut self, id: TimerId) -> Option<LogEntry> {
        let is_current = self.pending.is_some_and(|p| p.id == id);
        if !self.run_state.is_running() || !is_current {
            tracing::debug!(timer = id.0, "Ignoring stale timer");
            return None;
        }

        self.pending = None;
        let entry = self.play_random();
        self.rearm_if_running();
        entry
    }

    /// Fire the pending timer if it is due by the scheduler's clock
    pub fn poll(&mut self) -> Option<LogEntry> {
        let pending = self.pending?;
        if !pending.is_due(self.clock.now_millis()) {
            return None;
        }
        self.on_timer(pending.id)
    }

    fn play_random(&mut self) -> Option<LogEntry> {
        if self.selection.is_empty() {
            tracing::debug!("Timer fired with empty selection, nothing to play");
            return None;
        }

        let len = self.selection.len();
        let index = ((self.rng.r#gen::<f64>() * len as f64).floor() as usize).min(len - 1);
        let id = self.selection.get(index)?;

        let Some(sound) = self.catalog.find(id) else {
            tracing::warn!(sound_id = id, "Selected sound is not in the catalog");
            return None;
        };

        let volume = self.settings.volume_percent();
        tracing::info!(sound_id = id, sound = %sound.name, volume, "Playing sound");
        self.player.play(sound, volume);

        let entry = LogEntry {
            timestamp: format_utc8(self.clock.now()),
            sound_name: sound.name.clone(),
        };
        self.log.push(entry.clone());
        Some(entry)
    }

    fn rearm_if_running(&mut self) {
        if self.run_state.is_running() {
            self.rearm();
        }
    }

    /// Cancel the pending timer and draw a new one from current values
    fn rearm(&mut self) {
        if let Some(old) = self.pending.take() {
            tracing::debug!(timer = old.id.0, "Cancelled pending timer");
        }
        if self.selection.is_empty() {
            return;
        }

        let delay_ms = self.rng.r#gen::<f64>() * self.settings.max_delay_ms() as f64;
        let delay = Duration::from_millis(delay_ms as u64);

        self.next_timer_id += 1;
        let pending = PendingPlay {
            id: TimerId(self.next_timer_id),
            delay,
            fire_at_epoch_millis: self.clock.now_millis() + delay.as_millis() as i64,
        };
        tracing::debug!(
            timer = self.next_timer_id,
            delay_ms = delay.as_millis() as u64,
            "Armed timer"
        );
        self.pending = Some(pending);
    }
}
