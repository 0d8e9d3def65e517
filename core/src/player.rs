//! Player capability
//!
//! Renders a single sound at a given volume. Playback is fire-and-forget:
//! the scheduler never waits for completion and never hears about failures.

use ads_types::SoundDescriptor;

pub trait Player {
    /// Start playing `sound` at `volume_percent` (0-100) and return immediately
    fn play(&self, sound: &SoundDescriptor, volume_percent: u8);
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn play(&self, sound: &SoundDescriptor, volume_percent: u8) {
        (**self).play(sound, volume_percent)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every play request as `(sound id, sound name, volume)`,
    /// plus the resource of each request in `resources`
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPlayer {
        plays: Arc<Mutex<Vec<(String, String, u8)>>>,
        resources: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingPlayer {
        pub fn plays(&self) -> Vec<(String, String, u8)> {
            self.plays.lock().unwrap().clone()
        }

        pub fn resources(&self) -> Vec<String> {
            self.resources.lock().unwrap().clone()
        }
    }

    impl Player for RecordingPlayer {
        fn play(&self, sound: &SoundDescriptor, volume_percent: u8) {
            self.plays
                .lock()
                .unwrap()
                .push((sound.id.clone(), sound.name.clone(), volume_percent));
            self.resources.lock().unwrap().push(sound.resource.clone());
        }
    }
}
