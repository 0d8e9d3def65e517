use std::io::Write;

use ads_core::{AdsConfigExt, SchedulerError};
use ads_types::{LogEntry, MAX_FREQUENCY_MINUTES, MAX_VOLUME_PERCENT, RunState, SchedulerSnapshot};

use crate::CliContext;

pub async fn list_sounds(ctx: &CliContext) {
    let Some(snapshot) = snapshot(ctx).await else {
        return;
    };

    println!("{:<4} {:<4} {:<4} {:<24} Resource", "Row", "Sel", "Id", "Name");
    println!("{}", "-".repeat(65));
    for (row, sound) in (1..).zip(ctx.catalog.iter()) {
        let marker = if snapshot.selection.contains(&sound.id) {
            "[x]"
        } else {
            "[ ]"
        };
        println!(
            "{:<4} {:<4} {:<4} {:<24} {}",
            row, marker, sound.id, sound.name, sound.resource
        );
    }
    println!("\nSounds directory: {}", ctx.config.sounds_path().display());
}

pub async fn toggle_sound(id: &str, ctx: &CliContext) {
    if !ctx.catalog.contains(id) {
        println!("Unknown sound '{id}' (see `sounds`)");
        return;
    }
    match ctx.scheduler.toggle_sound(id).await {
        Ok(true) => println!("Selected {id}"),
        Ok(false) => println!("Deselected {id}"),
        Err(e) => println!("{e}"),
    }
}

pub async fn reset_sounds(ctx: &CliContext) {
    match ctx.scheduler.reset_selection().await {
        Ok(()) => println!("Selection cleared"),
        Err(e) => println!("{e}"),
    }
}

pub async fn set_frequency(minutes: i64, ctx: &CliContext) {
    match ctx.scheduler.set_frequency(minutes).await {
        Ok(stored) => println!("Frequency: {stored} min (max {MAX_FREQUENCY_MINUTES})"),
        Err(e) => println!("{e}"),
    }
}

pub async fn set_volume(percent: i64, ctx: &CliContext) {
    match ctx.scheduler.set_volume(percent).await {
        Ok(stored) => println!("Volume: {stored} % (max {MAX_VOLUME_PERCENT})"),
        Err(e) => println!("{e}"),
    }
}

pub async fn reset_settings(ctx: &CliContext) {
    if let Err(e) = ctx.scheduler.reset_settings().await {
        println!("{e}");
        return;
    }
    show_status(ctx).await;
}

/// `sound` is a row number as listed by `sounds` or a sound id
pub async fn test_play(sound: &str, ctx: &CliContext) {
    let result = match parse_row(sound) {
        Some(Some(index)) => ctx.scheduler.test_play_entry(index).await,
        Some(None) => Err(SchedulerError::NoSuchEntry { index: 0 }),
        None => ctx.scheduler.test_play(sound).await,
    };
    match result {
        Ok(()) => println!("Testing {sound}"),
        Err(SchedulerError::NoSuchEntry { .. }) => {
            println!("No sound in row {sound} (see `sounds`)")
        }
        Err(e) => println!("{e}"),
    }
}

/// Map a 1-based row number to a catalog index. `None` if `arg` is not a
/// number, `Some(None)` for row 0.
fn parse_row(arg: &str) -> Option<Option<usize>> {
    let row: usize = arg.parse().ok()?;
    Some(row.checked_sub(1))
}

pub async fn start(ctx: &CliContext) {
    report_run_result(ctx.scheduler.start().await.map(|()| RunState::Running));
}

pub async fn stop(ctx: &CliContext) {
    report_run_result(ctx.scheduler.stop().await.map(|()| RunState::Idle));
}

/// The START/STOP button
pub async fn toggle_run(ctx: &CliContext) {
    report_run_result(ctx.scheduler.toggle_run().await);
}

fn report_run_result(result: Result<RunState, SchedulerError>) {
    match result {
        Ok(RunState::Running) => println!("Running (press `go` to STOP)"),
        Ok(RunState::Idle) => println!("Stopped (press `go` to START)"),
        Err(e) => println!("! {e}"),
    }
}

pub async fn show_status(ctx: &CliContext) {
    let Some(snapshot) = snapshot(ctx).await else {
        return;
    };

    let state = match snapshot.run_state {
        RunState::Idle => "idle",
        RunState::Running => "running",
    };
    let selection = if snapshot.selection.is_empty() {
        "(none)".to_string()
    } else {
        snapshot.selection.join(", ")
    };

    println!("State:      {state} [{}]", snapshot.run_state.control_label());
    println!("Selection:  {selection}");
    println!(
        "Frequency:  {} min",
        snapshot.settings.frequency_minutes()
    );
    println!("Volume:     {} %", snapshot.settings.volume_percent());
    if let Some(next) = &snapshot.next_play_at {
        println!("Next play:  {next} (UTC+8)");
    }
    println!("Plays:      {}", snapshot.log.len());
}

pub async fn show_log(ctx: &CliContext) {
    let Some(snapshot) = snapshot(ctx).await else {
        return;
    };

    println!("Play Log (UTC+8)");
    for line in format_log(&snapshot.log) {
        println!("{line}");
    }
}

/// Render log entries, newest first
pub fn format_log(log: &[LogEntry]) -> Vec<String> {
    if log.is_empty() {
        return vec!["No sounds played yet...".to_string()];
    }
    log.iter()
        .map(|entry| format!("{:<20} {}", entry.timestamp, entry.sound_name))
        .collect()
}

pub fn exit() -> Result<(), String> {
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

async fn snapshot(ctx: &CliContext) -> Option<SchedulerSnapshot> {
    match ctx.scheduler.snapshot().await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            println!("{e}");
            None
        }
    }
}
