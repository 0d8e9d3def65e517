//! Randomized interval playback scheduler
//!
//! This module provides:
//! - **Selection**: the set of sound ids eligible for random play
//! - **Pending play**: the single outstanding timer while running
//! - **Scheduler**: the state machine that owns selection, settings,
//!   run state and the play log, and decides when the next play fires
//!
//! # Scheduling
//!
//! Every time a timer is armed the delay is drawn uniformly from
//! `[0, frequency)` minutes, so plays average half the configured
//! frequency apart and may land arbitrarily close together. Any change to
//! settings or selection while running cancels the pending timer and
//! draws a fresh one.

mod error;
mod machine;
mod pending;
mod selection;


pub use error::SchedulerError;
pub use machine::Scheduler;
pub use pending::{PendingPlay, TimerId};
pub use selection::Selection;
