//! Discrete emotion labels shown next to a character.
//!
//! The presentation layer maps each label to a portrait, so every character
//! declares which labels it can actually display (see `EmotionProfile`).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Flustered,
    Smug,
    Angry,
    Annoyed,
    Sad,
    Scared,
    Nervous,
    Drunk,
    Curious,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Flustered => "flustered",
            Emotion::Smug => "smug",
            Emotion::Angry => "angry",
            Emotion::Annoyed => "annoyed",
            Emotion::Sad => "sad",
            Emotion::Scared => "scared",
            Emotion::Nervous => "nervous",
            Emotion::Drunk => "drunk",
            Emotion::Curious => "curious",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        let json = serde_json::to_string(&Emotion::Curious).unwrap();
        assert_eq!(json, format!("\"{}\"", Emotion::Curious));
    }

}
