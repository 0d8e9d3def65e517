//! Tests for the scheduler service
//!
//! Run on a paused tokio clock so sleeping in the test advances virtual
//! time deterministically.

use std::time::Duration;

use ads_types::{RunState, SoundDescriptor};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{SchedulerEvent, SchedulerHandle, SchedulerService, create_event_channel};
use crate::catalog::SoundCatalog;
use crate::clock::SystemClock;
use crate::player::testing::RecordingPlayer;
use crate::scheduler::{Scheduler, SchedulerError};

struct Harness {
    handle: SchedulerHandle,
    player: RecordingPlayer,
    events: mpsc::Receiver<SchedulerEvent>,
    task: JoinHandle<()>,
}

fn spawn_service(seed: u64) -> Harness {
    let catalog = SoundCatalog::new(vec![
        SoundDescriptor::new("A", "Bell", "a.mp3"),
        SoundDescriptor::new("B", "Seatbelt", "b.mp3"),
        SoundDescriptor::new("C", "Message", "c.mp3"),
    ]);
    let player = RecordingPlayer::default();
    let scheduler = Scheduler::with_parts(
        catalog,
        player.clone(),
        StdRng::seed_from_u64(seed),
        SystemClock,
    );

    let (event_tx, events) = create_event_channel();
    let (service, handle) = SchedulerService::new(scheduler);
    let task = tokio::spawn(service.with_events(event_tx).run());

    Harness {
        handle,
        player,
        events,
        task,
    }
}

fn drain(events: &mut mpsc::Receiver<SchedulerEvent>) -> Vec<SchedulerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test(start_paused = true)]
async fn test_start_with_empty_selection_reports_error() {
    let h = spawn_service(1);

    assert_eq!(h.handle.start().await, Err(SchedulerError::EmptySelection));

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.run_state, RunState::Idle);
    assert_eq!(snapshot.next_play_at, None);
}

#[tokio::test(start_paused = true)]
async fn test_plays_fire_within_frequency() {
    let mut h = spawn_service(2);
    assert!(h.handle.toggle_sound("A").await.unwrap());
    assert!(h.handle.toggle_sound("B").await.unwrap());
    assert_eq!(h.handle.set_frequency(1).await.unwrap(), 1);

    h.handle.start().await.unwrap();
    // every delay is under one minute, so at least one play must happen
    tokio::time::sleep(Duration::from_secs(60)).await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.run_state, RunState::Running);
    assert!(!snapshot.log.is_empty());
    for entry in &snapshot.log {
        assert!(entry.sound_name == "Bell" || entry.sound_name == "Seatbelt");
    }
    assert_eq!(h.player.plays().len(), snapshot.log.len());

    let events = drain(&mut h.events);
    assert_eq!(events[0], SchedulerEvent::RunStateChanged(RunState::Running));
    let played = events
        .iter()
        .filter(|e| matches!(e, SchedulerEvent::Played(_)))
        .count();
    assert_eq!(played, snapshot.log.len());
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_pending_play() {
    let mut h = spawn_service(3);
    h.handle.toggle_sound("C").await.unwrap();
    h.handle.set_frequency(60).await.unwrap();
    h.handle.start().await.unwrap();

    h.handle.stop().await.unwrap();
    tokio::time::sleep(Duration::from_secs(2 * 60 * 60)).await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.run_state, RunState::Idle);
    assert!(snapshot.log.is_empty());
    assert!(h.player.plays().is_empty());
    assert_eq!(
        drain(&mut h.events),
        vec![
            SchedulerEvent::RunStateChanged(RunState::Running),
            SchedulerEvent::RunStateChanged(RunState::Idle),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_clears_log_after_plays() {
    let h = spawn_service(4);
    h.handle.toggle_sound("A").await.unwrap();
    h.handle.set_frequency(1).await.unwrap();
    assert_eq!(h.handle.toggle_run().await, Ok(RunState::Running));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(!h.handle.snapshot().await.unwrap().log.is_empty());

    assert_eq!(h.handle.toggle_run().await, Ok(RunState::Idle));
    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.log.is_empty());
    assert_eq!(snapshot.next_play_at, None);
}

#[tokio::test(start_paused = true)]
async fn test_emptied_selection_pauses_cycle() {
    let h = spawn_service(5);
    h.handle.toggle_sound("A").await.unwrap();
    h.handle.set_frequency(1).await.unwrap();
    h.handle.start().await.unwrap();

    h.handle.reset_selection().await.unwrap();
    tokio::time::sleep(Duration::from_secs(10 * 60)).await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.run_state, RunState::Running);
    assert!(snapshot.selection.is_empty());
    assert!(h.player.plays().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_test_play_and_settings_through_handle() {
    let h = spawn_service(6);

    assert_eq!(h.handle.set_volume(150).await.unwrap(), 100);
    h.handle.test_play("B").await.unwrap();
    assert_eq!(
        h.handle.test_play("nope").await,
        Err(SchedulerError::UnknownSound {
            id: "nope".to_string()
        })
    );
    h.handle.reset_settings().await.unwrap();

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.settings.volume_percent(), 20);
    assert_eq!(snapshot.settings.frequency_minutes(), 5);
    assert!(snapshot.log.is_empty());
    assert_eq!(
        h.player.plays(),
        vec![("B".to_string(), "Seatbelt".to_string(), 100)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_test_play_entry_through_handle() {
    let h = spawn_service(8);

    h.handle.test_play_entry(2).await.unwrap();
    assert_eq!(
        h.handle.test_play_entry(3).await,
        Err(SchedulerError::NoSuchEntry { index: 3 })
    );

    assert_eq!(h.player.resources(), vec!["c.mp3"]);
    assert!(h.handle.snapshot().await.unwrap().log.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_handle_fails_after_shutdown() {
    let h = spawn_service(7);

    h.handle.shutdown().await.unwrap();
    h.task.await.unwrap();

    assert_eq!(
        h.handle.snapshot().await,
        Err(SchedulerError::ServiceStopped)
    );
    assert_eq!(
        h.handle.toggle_sound("A").await,
        Err(SchedulerError::ServiceStopped)
    );
}
