use std::time::Duration;

/// Identity of one armed timer.
///
/// Every re-arm produces a new id, so a fire carrying an old id is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

/// The single outstanding scheduled play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPlay {
    pub id: TimerId,
    /// Delay drawn when the timer was armed
    pub delay: Duration,
    pub fire_at_epoch_millis: i64,
}

impl PendingPlay {
    pub fn is_due(&self, now_millis: i64) -> bool {
        now_millis >= self.fire_at_epoch_millis
    }
}
