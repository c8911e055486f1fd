use crate::emotion::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Player,
    Character,
}

/// One line of the dialogue log kept by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub speaker: Speaker,
    pub text: String,
    /// Emotion shown with a character line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    /// Affection change caused by the exchange, recorded on the character line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affection_delta: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl DialogueEntry {
    pub fn player(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Player,
            text: text.into(),
            emotion: None,
            affection_delta: None,
            timestamp: Utc::now(),
        }
    }

    pub fn character(text: impl Into<String>, emotion: Emotion, affection_delta: i32) -> Self {
        Self {
            speaker: Speaker::Character,
            text: text.into(),
            emotion: Some(emotion),
            affection_delta: Some(affection_delta),
            timestamp: Utc::now(),
        }
    }
}
