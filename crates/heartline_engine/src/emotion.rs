//! Emotion shown after a turn.
//!
//! Rules are checked in order and the first match wins:
//! affection rose, affection fell, signature marker in the reply, question
//! mark in the reply, otherwise neutral. A label the character cannot display
//! degrades to neutral.

use heartline_core::{CharacterProfile, Emotion};

pub fn derive_emotion(response_text: &str, affection_delta: i32, profile: &CharacterProfile) -> Emotion {
    let emotions = &profile.emotions;

    let picked = if affection_delta > 0 {
        emotions.positive
    } else if affection_delta < 0 {
        emotions.negative
    } else if let Some(signature) = emotions
        .signature
        .filter(|_| profile.has_signature(response_text))
    {
        signature
    } else if response_text.contains('?') {
        Emotion::Curious
    } else {
        Emotion::Neutral
    };

    if emotions.allows(picked) {
        picked
    } else {
        tracing::debug!(
            "{} cannot display {}, falling back to neutral",
            profile.id,
            picked
        );
        Emotion::Neutral
    }
}
