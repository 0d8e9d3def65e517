//! Sound playback through rodio
//!
//! A single playback thread owns the output stream and receives play
//! requests over a bounded channel. Requests that arrive while the queue is
//! full, or while `MAX_ACTIVE_SOUNDS` sounds are still playing, are dropped,
//! so a zero-minute frequency cannot pile up threads or output devices.
//! Failures are logged and otherwise ignored.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ads_core::Player;
use ads_types::SoundDescriptor;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tokio::sync::mpsc;

const QUEUE_SIZE: usize = 16;
const MAX_ACTIVE_SOUNDS: usize = 8;

/// A resolved sound file ready for the playback thread
#[derive(Debug, Clone, PartialEq)]
struct PlayRequest {
    path: PathBuf,
    volume: f32,
}

/// Plays catalog resources as files under a sounds directory
pub struct RodioPlayer {
    sounds_dir: PathBuf,
    request_tx: mpsc::Sender<PlayRequest>,
}

impl RodioPlayer {
    /// Create the player and spawn its playback thread
    pub fn new(sounds_dir: PathBuf) -> Self {
        let (request_tx, request_rx) = mpsc::channel(QUEUE_SIZE);
        if let Err(e) = std::thread::Builder::new()
            .name("ads-audio".to_string())
            .spawn(move || run_output(request_rx))
        {
            tracing::warn!(error = %e, "Failed to start audio thread, sounds are disabled");
        }
        Self::with_sender(sounds_dir, request_tx)
    }

    fn with_sender(sounds_dir: PathBuf, request_tx: mpsc::Sender<PlayRequest>) -> Self {
        Self {
            sounds_dir,
            request_tx,
        }
    }
}

impl Player for RodioPlayer {
    fn play(&self, sound: &SoundDescriptor, volume_percent: u8) {
        let Some(request) = prepare(&self.sounds_dir, sound, volume_percent) else {
            return;
        };
        if let Err(e) = self.request_tx.try_send(request) {
            tracing::debug!(sound_id = %sound.id, error = %e, "Dropped play request");
        }
    }
}

/// Absolute resources are used as-is, relative ones resolve against the
/// sounds directory
fn resolve(sounds_dir: &Path, resource: &str) -> PathBuf {
    let candidate = PathBuf::from(resource);
    if candidate.is_absolute() {
        candidate
    } else {
        sounds_dir.join(candidate)
    }
}

/// Build the request for `sound`, or `None` if its file does not exist
fn prepare(sounds_dir: &Path, sound: &SoundDescriptor, volume_percent: u8) -> Option<PlayRequest> {
    let path = resolve(sounds_dir, &sound.resource);
    if !path.exists() {
        tracing::warn!(sound_id = %sound.id, path = ?path, "Sound file not found");
        return None;
    }
    Some(PlayRequest {
        path,
        volume: (volume_percent as f32 / 100.0).clamp(0.0, 1.0),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Playback thread
// ─────────────────────────────────────────────────────────────────────────────

/// Own the output stream and play requests until every sender is gone
fn run_output(mut request_rx: mpsc::Receiver<PlayRequest>) {
    // The stream must outlive every sink created from its handle
    let stream = OutputStream::try_default();
    let handle = match &stream {
        Ok((_stream, handle)) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "No audio output device available");
            None
        }
    };

    let mut active: VecDeque<Sink> = VecDeque::new();
    while let Some(request) = request_rx.blocking_recv() {
        let Some(handle) = handle else {
            continue;
        };
        active.retain(|sink| !sink.empty());
        if active.len() >= MAX_ACTIVE_SOUNDS {
            tracing::debug!(path = ?request.path, "Too many sounds playing, skipping");
            continue;
        }
        if let Some(sink) = start_sink(handle, &request) {
            active.push_back(sink);
        }
    }
    tracing::debug!("Audio thread stopped");
}

fn start_sink(handle: &OutputStreamHandle, request: &PlayRequest) -> Option<Sink> {
    let path = &request.path;
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Failed to open sound file");
            return None;
        }
    };
    let source = match Decoder::new(BufReader::new(file)) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Failed to decode sound file");
            return None;
        }
    };
    let sink = match Sink::try_new(handle) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Failed to create audio sink");
            return None;
        }
    };

    sink.set_volume(request.volume);
    sink.append(source);
    Some(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_sound(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ads-audio-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, b"not really audio").unwrap();
        path
    }

    #[test]
    fn relative_resources_resolve_under_sounds_dir() {
        assert_eq!(
            resolve(Path::new("/opt/ads/sounds"), "sound-a.mp3"),
            PathBuf::from("/opt/ads/sounds/sound-a.mp3")
        );
    }

    #[cfg(unix)]
    #[test]
    fn absolute_resources_are_kept() {
        assert_eq!(
            resolve(Path::new("/opt/ads/sounds"), "/tmp/bell.wav"),
            PathBuf::from("/tmp/bell.wav")
        );
    }

    #[test]
    fn missing_file_is_not_queued() {
        let (tx, mut rx) = mpsc::channel(QUEUE_SIZE);
        let player = RodioPlayer::with_sender(PathBuf::from("/definitely/not/here"), tx);

        let sound = SoundDescriptor::new("A", "Bell", "a.mp3");
        assert_eq!(prepare(Path::new("/definitely/not/here"), &sound, 50), None);
        player.play(&sound, 50);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn existing_file_is_queued_with_volume() {
        let path = temp_sound("bell.mp3");
        let sounds_dir = path.parent().unwrap().to_path_buf();
        let (tx, mut rx) = mpsc::channel(QUEUE_SIZE);
        let player = RodioPlayer::with_sender(sounds_dir, tx);

        player.play(&SoundDescriptor::new("A", "Bell", "bell.mp3"), 50);

        assert_eq!(
            rx.try_recv().unwrap(),
            PlayRequest {
                path,
                volume: 0.5
            }
        );
    }

    #[test]
    fn full_queue_drops_requests() {
        let path = temp_sound("seatbelt.mp3");
        let sounds_dir = path.parent().unwrap().to_path_buf();
        let (tx, mut rx) = mpsc::channel(1);
        let player = RodioPlayer::with_sender(sounds_dir, tx);

        let sound = SoundDescriptor::new("B", "Seatbelt", "seatbelt.mp3");
        for _ in 0..3 {
            player.play(&sound, 20);
        }

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
