use std::sync::Arc;

use ads_core::service::create_event_channel;
use ads_core::{AdsConfig, AdsConfigExt, ConfigError, Scheduler, SchedulerEvent, SchedulerHandle};
use ads_core::{SchedulerService, SoundCatalog};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::audio::RodioPlayer;

#[derive(Default)]
pub struct BackgroundTasks {
    pub scheduler: Option<JoinHandle<()>>,
    pub event_printer: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub async fn abort_all(&mut self) {
        if let Some(handle) = self.event_printer.take() {
            handle.abort();
        }
        if let Some(handle) = self.scheduler.take() {
            handle.abort();
        }
    }
}

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the scheduler service.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<AdsConfig>,
    pub catalog: Arc<SoundCatalog>,
    pub scheduler: SchedulerHandle,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
}

impl CliContext {
    /// Build the catalog, spawn the scheduler service and start printing
    /// play events as they happen
    pub fn new(config: AdsConfig) -> Result<Self, ConfigError> {
        let catalog = SoundCatalog::from_config(&config)?;
        let player = RodioPlayer::new(config.sounds_path());
        let scheduler = Scheduler::new(catalog.clone(), player);

        let (event_tx, event_rx) = create_event_channel();
        let (service, handle) = SchedulerService::new(scheduler);

        let tasks = BackgroundTasks {
            scheduler: Some(tokio::spawn(service.with_events(event_tx).run())),
            event_printer: Some(tokio::spawn(print_events(event_rx))),
        };

        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            scheduler: handle,
            tasks: Arc::new(Mutex::new(tasks)),
        })
    }

    /// Stop the scheduler service and the event printer
    pub async fn shutdown(&self) {
        if let Err(e) = self.scheduler.shutdown().await {
            tracing::debug!(error = %e, "Scheduler already stopped");
        }
        self.tasks.lock().await.abort_all().await;
    }
}

async fn print_events(mut events: mpsc::Receiver<SchedulerEvent>) {
    while let Some(event) = events.recv().await {
        if let SchedulerEvent::Played(entry) = event {
            println!("\n[{}] {}", entry.timestamp, entry.sound_name);
        }
    }
}
