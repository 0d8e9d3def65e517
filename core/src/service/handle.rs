use ads_types::{RunState, SchedulerSnapshot};
use tokio::sync::{mpsc, oneshot};

use super::SchedulerCommand;
use crate::scheduler::SchedulerError;

/// Handle for sending commands to a running `SchedulerService`.
///
/// Every method fails with `SchedulerError::ServiceStopped` once the
/// service task has ended.
#[derive(Clone)]
pub struct SchedulerHandle {
    cmd_tx: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    pub(super) fn new(cmd_tx: mpsc::Sender<SchedulerCommand>) -> Self {
        Self { cmd_tx }
    }

    pub async fn toggle_sound(&self, id: &str) -> Result<bool, SchedulerError> {
        self.request(|reply| SchedulerCommand::ToggleSound {
            id: id.to_string(),
            reply,
        })
        .await
    }

    pub async fn reset_selection(&self) -> Result<(), SchedulerError> {
        self.send(SchedulerCommand::ResetSelection).await
    }

    pub async fn set_frequency(&self, minutes: i64) -> Result<u8, SchedulerError> {
        self.request(|reply| SchedulerCommand::SetFrequency { minutes, reply })
            .await
    }

    pub async fn set_volume(&self, percent: i64) -> Result<u8, SchedulerError> {
        self.request(|reply| SchedulerCommand::SetVolume { percent, reply })
            .await
    }

    pub async fn reset_settings(&self) -> Result<(), SchedulerError> {
        self.send(SchedulerCommand::ResetSettings).await
    }

    pub async fn test_play(&self, id: &str) -> Result<(), SchedulerError> {
        self.request(|reply| SchedulerCommand::TestPlay {
            id: id.to_string(),
            reply,
        })
        .await?
    }

    /// Test play the catalog entry at `index` (0-based)
    pub async fn test_play_entry(&self, index: usize) -> Result<(), SchedulerError> {
        self.request(|reply| SchedulerCommand::TestPlayEntry { index, reply })
            .await?
    }

    pub async fn start(&self) -> Result<(), SchedulerError> {
        self.request(|reply| SchedulerCommand::Start { reply }).await?
    }

    pub async fn stop(&self) -> Result<(), SchedulerError> {
        self.send(SchedulerCommand::Stop).await
    }

    pub async fn toggle_run(&self) -> Result<RunState, SchedulerError> {
        self.request(|reply| SchedulerCommand::ToggleRun { reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<SchedulerSnapshot, SchedulerError> {
        self.request(|reply| SchedulerCommand::Snapshot { reply })
            .await
    }

    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        self.send(SchedulerCommand::Shutdown).await
    }

    async fn send(&self, cmd: SchedulerCommand) -> Result<(), SchedulerError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| SchedulerError::ServiceStopped)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SchedulerCommand,
    ) -> Result<T, SchedulerError> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        rx.await.map_err(|_| SchedulerError::ServiceStopped)
    }
}
