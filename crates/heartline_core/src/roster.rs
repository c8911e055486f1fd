//! The character roster: per-character tables loaded as configuration.
//!
//! A default roster ships inside the crate. Deployments can point
//! `roster.path` at their own TOML file with the same layout.

use crate::character::{CharacterId, CharacterProfile};
use crate::emotion::Emotion;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

const DEFAULT_ROSTER: &str = include_str!("../assets/roster.toml");

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse roster: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("character {0} is defined more than once")]
    DuplicateCharacter(CharacterId),

    #[error("character {character}: content id {id} is defined more than once")]
    DuplicateContent { character: CharacterId, id: String },

    #[error("character {character}: content {id} has threshold {threshold}, above 100")]
    ThresholdOutOfRange {
        character: CharacterId,
        id: String,
        threshold: u8,
    },

    #[error("character {character}: emotion {emotion} is used but not in its allowed set")]
    EmotionNotAllowed {
        character: CharacterId,
        emotion: Emotion,
    },

    #[error("character {0} has no fallback lines and no greeting")]
    NoFallback(CharacterId),

    #[error("roster defines no characters")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    characters: Vec<CharacterProfile>,
}

/// Validated set of character profiles keyed by `CharacterId`.
#[derive(Debug, Clone)]
pub struct Roster {
    characters: BTreeMap<CharacterId, CharacterProfile>,
}

impl Roster {
    /// The roster compiled into the crate.
    pub fn builtin() -> Result<Self, RosterError> {
        Self::from_toml(DEFAULT_ROSTER)
    }

    pub fn from_toml(source: &str) -> Result<Self, RosterError> {
        let file: RosterFile = toml::from_str(source)?;
        Self::from_profiles(file.characters)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let roster = Self::from_toml(&content)?;
        tracing::info!(
            "Loaded roster with {} characters from {}",
            roster.len(),
            path.as_ref().display()
        );
        Ok(roster)
    }

    pub fn from_profiles(profiles: Vec<CharacterProfile>) -> Result<Self, RosterError> {
        if profiles.is_empty() {
            return Err(RosterError::Empty);
        }
        let mut characters = BTreeMap::new();
        for profile in profiles {
            validate_profile(&profile)?;
            let id = profile.id;
            if characters.insert(id, profile).is_some() {
                return Err(RosterError::DuplicateCharacter(id));
            }
        }
        Ok(Self { characters })
    }

    pub fn get(&self, id: CharacterId) -> Option<&CharacterProfile> {
        self.characters.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterProfile> {
        self.characters.values()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

fn validate_profile(profile: &CharacterProfile) -> Result<(), RosterError> {
    let mut seen = HashSet::new();
    for item in &profile.content {
        if item.threshold > crate::relationship::MAX_AFFECTION {
            return Err(RosterError::ThresholdOutOfRange {
                character: profile.id,
                id: item.id.to_string(),
                threshold: item.threshold,
            });
        }
        if !seen.insert(&item.id) {
            return Err(RosterError::DuplicateContent {
                character: profile.id,
                id: item.id.to_string(),
            });
        }
    }

    let emotions = &profile.emotions;
    let used = [Some(emotions.positive), Some(emotions.negative), emotions.signature];
    for emotion in used.into_iter().flatten() {
        if !emotions.allows(emotion) {
            return Err(RosterError::EmotionNotAllowed {
                character: profile.id,
                emotion,
            });
        }
    }

    if profile.fallback.is_empty() && profile.greeting.is_empty() {
        return Err(RosterError::NoFallback(profile.id));
    }
    Ok(())
}
