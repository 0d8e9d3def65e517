//! Sound catalog
//!
//! Static, ordered list of the sounds the scheduler can choose from.
//! Loaded once at startup and never mutated afterwards.

use ads_types::{AdsConfig, SoundDescriptor};

use crate::context::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct SoundCatalog {
    sounds: Vec<SoundDescriptor>,
}

impl SoundCatalog {
    pub fn new(sounds: Vec<SoundDescriptor>) -> Self {
        Self { sounds }
    }

    /// Build the catalog from configuration.
    ///
    /// Duplicate ids are accepted (the cycle only ever plays the first entry
    /// for an id) but each one is reported so the config can be fixed.
    pub fn from_config(config: &AdsConfig) -> Result<Self, ConfigError> {
        if config.sounds.is_empty() {
            return Err(ConfigError::InvalidCatalog {
                reason: "no sounds configured".to_string(),
            });
        }
        if let Some(blank) = config.sounds.iter().find(|s| s.id.trim().is_empty()) {
            return Err(ConfigError::InvalidCatalog {
                reason: format!("sound '{}' has an empty id", blank.name),
            });
        }

        let catalog = Self::new(config.sounds.clone());
        for id in catalog.duplicate_ids() {
            tracing::warn!(
                sound_id = id,
                "Duplicate sound id in catalog, only the first entry will be played by the cycle"
            );
        }
        Ok(catalog)
    }

    /// Resolve an id to its descriptor (first match wins)
    pub fn find(&self, id: &str) -> Option<&SoundDescriptor> {
        self.sounds.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SoundDescriptor> {
        self.sounds.iter()
    }

    /// Entry at catalog position `index` (0-based), duplicates included
    pub fn get(&self, index: usize) -> Option<&SoundDescriptor> {
        self.sounds.get(index)
    }

    /// Ids that appear more than once, each reported once, in catalog order
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for sound in &self.sounds {
            let id = sound.id.as_str();
            if seen.contains(&id) {
                if !duplicates.contains(&id) {
                    duplicates.push(id);
                }
            } else {
                seen.push(id);
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ads_types::default_sounds;

    #[test]
    fn find_resolves_first_match_for_duplicate_ids() {
        let catalog = SoundCatalog::new(default_sounds());
        let sound = catalog.find("E").unwrap();
        assert_eq!(sound.name, "LINE聲響 2");
        assert_eq!(sound.resource, "sound-e.mp3");
    }

    #[test]
    fn find_unknown_id_is_none() {
        let catalog = SoundCatalog::new(default_sounds());
        assert!(catalog.find("Z").is_none());
        assert!(!catalog.contains("Z"));
    }

    #[test]
    fn get_reaches_every_duplicate_entry() {
        let catalog = SoundCatalog::new(default_sounds());
        let resources: Vec<_> = (4..7)
            .filter_map(|i| catalog.get(i))
            .map(|s| (s.id.as_str(), s.resource.as_str()))
            .collect();
        assert_eq!(
            resources,
            vec![
                ("E", "sound-e.mp3"),
                ("E", "sound-f.mp3"),
                ("E", "sound-g.mp3"),
            ]
        );
        assert!(catalog.get(7).is_none());
    }

    #[test]
    fn duplicate_ids_reported_once() {
        let catalog = SoundCatalog::new(default_sounds());
        assert_eq!(catalog.duplicate_ids(), vec!["E"]);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let config = AdsConfig {
            sounds_dir: String::new(),
            sounds: Vec::new(),
        };
        assert!(matches!(
            SoundCatalog::from_config(&config),
            Err(ConfigError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn blank_id_is_rejected() {
        let config = AdsConfig {
            sounds_dir: String::new(),
            sounds: vec![SoundDescriptor::new(" ", "Bell", "bell.mp3")],
        };
        assert!(SoundCatalog::from_config(&config).is_err());
    }
}
