//! Relationship records and the tiers derived from affection.
//!
//! A `RelationshipRecord` exists once per player x character pair. It is only
//! ever replaced by a new snapshot produced by the relationship engine; nothing
//! else mutates it in place.

use crate::character::CharacterId;
use crate::emotion::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Upper bound of the affection scale.
pub const MAX_AFFECTION: u8 = 100;

/// Named band of affection, ordered from coldest to warmest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipTier {
    Stranger,
    Acquaintance,
    Friend,
    CloseFriend,
    LoveInterest,
    Soulmate,
}

impl RelationshipTier {
    pub const ALL: [RelationshipTier; 6] = [
        RelationshipTier::Stranger,
        RelationshipTier::Acquaintance,
        RelationshipTier::Friend,
        RelationshipTier::CloseFriend,
        RelationshipTier::LoveInterest,
        RelationshipTier::Soulmate,
    ];

    /// Map an affection level to its tier.
    ///
    /// Breakpoints: 0-19, 20-39, 40-59, 60-79, 80-94, 95-100. Callers clamp the
    /// level before asking; values above 100 are a precondition violation.
    pub fn from_affection(level: u8) -> Self {
        debug_assert!(level <= MAX_AFFECTION, "affection {} out of range", level);
        match level {
            0..=19 => RelationshipTier::Stranger,
            20..=39 => RelationshipTier::Acquaintance,
            40..=59 => RelationshipTier::Friend,
            60..=79 => RelationshipTier::CloseFriend,
            80..=94 => RelationshipTier::LoveInterest,
            _ => RelationshipTier::Soulmate,
        }
    }

    /// Lowest affection level that belongs to this tier.
    pub fn floor(&self) -> u8 {
        match self {
            RelationshipTier::Stranger => 0,
            RelationshipTier::Acquaintance => 20,
            RelationshipTier::Friend => 40,
            RelationshipTier::CloseFriend => 60,
            RelationshipTier::LoveInterest => 80,
            RelationshipTier::Soulmate => 95,
        }
    }

    /// The next warmer tier, if any.
    pub fn next(&self) -> Option<RelationshipTier> {
        match self {
            RelationshipTier::Stranger => Some(RelationshipTier::Acquaintance),
            RelationshipTier::Acquaintance => Some(RelationshipTier::Friend),
            RelationshipTier::Friend => Some(RelationshipTier::CloseFriend),
            RelationshipTier::CloseFriend => Some(RelationshipTier::LoveInterest),
            RelationshipTier::LoveInterest => Some(RelationshipTier::Soulmate),
            RelationshipTier::Soulmate => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RelationshipTier::Stranger => "Stranger",
            RelationshipTier::Acquaintance => "Acquaintance",
            RelationshipTier::Friend => "Friend",
            RelationshipTier::CloseFriend => "Close Friend",
            RelationshipTier::LoveInterest => "Love Interest",
            RelationshipTier::Soulmate => "Soulmate",
        }
    }
}

impl fmt::Display for RelationshipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque identifier of an unlockable piece of content (a backstory segment,
/// a scene, ...). Thresholds for these live in the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque player identifier supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of one relationship: a player paired with a character.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub player: PlayerId,
    pub character: CharacterId,
}

impl PairKey {
    pub fn new(player: PlayerId, character: CharacterId) -> Self {
        Self { player, character }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.player, self.character)
    }
}

/// Persistent relationship state between a player and one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub character: CharacterId,
    /// 0..=100
    pub affection_level: u8,
    /// Always `RelationshipTier::from_affection(affection_level)`.
    pub relationship_tier: RelationshipTier,
    pub current_emotion: Emotion,
    pub conversation_count: u32,
    /// Grows only. Nothing in the engine ever removes an entry.
    pub unlocked_content_ids: BTreeSet<ContentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RelationshipRecord {
    /// Fresh record for a first meeting.
    pub fn new(character: CharacterId) -> Self {
        let now = Utc::now();
        Self {
            character,
            affection_level: 0,
            relationship_tier: RelationshipTier::Stranger,
            current_emotion: Emotion::Neutral,
            conversation_count: 0,
            unlocked_content_ids: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_unlocked(&self, id: &ContentId) -> bool {
        self.unlocked_content_ids.contains(id)
    }

    /// Clamp the level into `[0, 100]` and rederive the tier from it.
    /// Returns whether anything had to change.
    pub fn repair(&mut self) -> bool {
        let level = self.affection_level.min(MAX_AFFECTION);
        let tier = RelationshipTier::from_affection(level);
        let changed = level != self.affection_level || tier != self.relationship_tier;
        self.affection_level = level;
        self.relationship_tier = tier;
        changed
    }

    /// Points still needed to reach the next tier, `None` at Soulmate.
    pub fn points_to_next_tier(&self) -> Option<u8> {
        self.relationship_tier
            .next()
            .map(|t| t.floor().saturating_sub(self.affection_level))
    }
}

/// One user turn as seen by the engine. Never persisted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionEvent {
    pub user_text: String,
    pub response_text: String,
}

impl InteractionEvent {
    pub fn new(user_text: impl Into<String>, response_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            response_text: response_text.into(),
        }
    }
}
