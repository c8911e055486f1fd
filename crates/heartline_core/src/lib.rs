//! # Heartline core types
//!
//! Data shared by every Heartline crate: relationship records and tiers,
//! emotion labels, the character roster, the dialogue log entry, keyword
//! lists and configuration. Nothing in here performs I/O except roster and
//! config loading.

pub mod character;
pub mod config;
pub mod dialogue;
pub mod emotion;
pub mod relationship;
pub mod roster;
pub mod sentiment;

pub use character::{
    CharacterId, CharacterProfile, CharacterTrait, ContentItem, EmotionProfile, FallbackLines,
};
pub use config::HeartlineConfig;
pub use dialogue::{DialogueEntry, Speaker};
pub use emotion::Emotion;
pub use relationship::{
    ContentId, InteractionEvent, PairKey, PlayerId, RelationshipRecord, RelationshipTier,
    MAX_AFFECTION,
};
pub use roster::{Roster, RosterError};
