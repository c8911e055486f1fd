//! Character profiles: traits, emotion sets, unlockable content and
//! static fallback dialogue.
//!
//! Profiles are plain data loaded from the roster; the engine reads them but
//! never mutates them.

use crate::emotion::Emotion;
use crate::relationship::{ContentId, RelationshipTier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a playable character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterId {
    Vex,
    Juniper,
    Marlow,
}

impl CharacterId {
    pub const ALL: [CharacterId; 3] = [CharacterId::Vex, CharacterId::Juniper, CharacterId::Marlow];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterId::Vex => "vex",
            CharacterId::Juniper => "juniper",
            CharacterId::Marlow => "marlow",
        }
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vex" => Ok(CharacterId::Vex),
            "juniper" => Ok(CharacterId::Juniper),
            "marlow" => Ok(CharacterId::Marlow),
            other => Err(format!("unknown character: {}", other)),
        }
    }
}

/// Personality tags that modify how affection bonuses apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterTrait {
    /// Compliments earn nothing.
    Arrogant,
    /// Compliments count double.
    Warm,
    /// Insults cost double.
    Sensitive,
    /// Signature moments earn nothing.
    Stoic,
}

/// Which emotion labels a character uses and can display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionProfile {
    /// Shown after a turn that raised affection.
    #[serde(default = "default_positive")]
    pub positive: Emotion,
    /// Shown after a turn that lowered affection.
    #[serde(default = "default_negative")]
    pub negative: Emotion,
    /// Shown when the reply contains one of the signature markers.
    #[serde(default)]
    pub signature: Option<Emotion>,
    /// Labels the presentation layer has art for. `neutral` is implied.
    #[serde(default)]
    pub allowed: BTreeSet<Emotion>,
}

fn default_positive() -> Emotion {
    Emotion::Happy
}

fn default_negative() -> Emotion {
    Emotion::Angry
}

impl Default for EmotionProfile {
    fn default() -> Self {
        Self {
            positive: default_positive(),
            negative: default_negative(),
            signature: None,
            allowed: [Emotion::Happy, Emotion::Angry, Emotion::Curious]
                .into_iter()
                .collect(),
        }
    }
}

impl EmotionProfile {
    pub fn allows(&self, emotion: Emotion) -> bool {
        emotion == Emotion::Neutral || self.allowed.contains(&emotion)
    }
}

/// A piece of narrative content gated on affection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    /// Required affection level, 0..=100.
    pub threshold: u8,
    #[serde(default)]
    pub body: String,
}

/// Static replies used when no AI provider is available, bucketed by tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackLines {
    pub stranger: Vec<String>,
    pub acquaintance: Vec<String>,
    pub friend: Vec<String>,
    pub close_friend: Vec<String>,
    pub love_interest: Vec<String>,
    pub soulmate: Vec<String>,
}

impl FallbackLines {
    pub fn for_tier(&self, tier: RelationshipTier) -> &[String] {
        match tier {
            RelationshipTier::Stranger => &self.stranger,
            RelationshipTier::Acquaintance => &self.acquaintance,
            RelationshipTier::Friend => &self.friend,
            RelationshipTier::CloseFriend => &self.close_friend,
            RelationshipTier::LoveInterest => &self.love_interest,
            RelationshipTier::Soulmate => &self.soulmate,
        }
    }

    pub fn is_empty(&self) -> bool {
        RelationshipTier::ALL
            .iter()
            .all(|t| self.for_tier(*t).is_empty())
    }
}

/// Everything the game knows about one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: CharacterId,
    pub name: String,
    /// Persona description handed to the AI provider.
    pub persona: String,
    #[serde(default)]
    pub traits: BTreeSet<CharacterTrait>,
    /// Catchphrases or stage directions that mark a signature moment.
    #[serde(default)]
    pub signature_markers: Vec<String>,
    #[serde(default)]
    pub emotions: EmotionProfile,
    #[serde(default)]
    pub greeting: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default)]
    pub fallback: FallbackLines,
}

impl CharacterProfile {
    pub fn has_trait(&self, t: CharacterTrait) -> bool {
        self.traits.contains(&t)
    }

    /// Threshold table: content id -> required affection.
    pub fn content_thresholds(&self) -> BTreeMap<ContentId, u8> {
        self.content
            .iter()
            .map(|item| (item.id.clone(), item.threshold))
            .collect()
    }

    pub fn content_item(&self, id: &ContentId) -> Option<&ContentItem> {
        self.content.iter().find(|item| &item.id == id)
    }

    /// Case-insensitive check for any signature marker in `text`.
    pub fn has_signature(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        self.signature_markers
            .iter()
            .filter(|m| !m.is_empty())
            .any(|m| lower.contains(&m.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CharacterProfile {
        CharacterProfile {
            id: CharacterId::Vex,
            name: "Vex".to_string(),
            persona: "inventor".to_string(),
            traits: [CharacterTrait::Arrogant].into_iter().collect(),
            signature_markers: vec!["*BURP*".to_string()],
            emotions: EmotionProfile::default(),
            greeting: "What.".to_string(),
            content: vec![ContentItem {
                id: ContentId::new("vex_garage"),
                title: "The Garage".to_string(),
                threshold: 25,
                body: String::new(),
            }],
            fallback: FallbackLines::default(),
        }
    }

    #[test]
    fn test_signature_case_insensitive() {
        let p = sample();
        assert!(p.has_signature("ugh *burp* whatever"));
        assert!(!p.has_signature("burp"));
        assert!(!p.has_signature(""));
    }

    #[test]
    fn test_content_thresholds() {
        let p = sample();
        let table = p.content_thresholds();
        assert_eq!(table.get(&ContentId::new("vex_garage")), Some(&25));
        assert!(p.content_item(&ContentId::new("missing")).is_none());
    }

    #[test]
    fn test_neutral_always_allowed() {
        let profile = EmotionProfile {
            allowed: BTreeSet::new(),
            ..EmotionProfile::default()
        };
        assert!(profile.allows(Emotion::Neutral));
        assert!(!profile.allows(Emotion::Drunk));
    }

    #[test]
    fn test_character_id_parse() {
        assert_eq!("Juniper".parse::<CharacterId>().unwrap(), CharacterId::Juniper);
        assert!("rick".parse::<CharacterId>().is_err());
    }
}
