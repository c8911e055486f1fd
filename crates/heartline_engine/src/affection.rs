//! Per-turn affection delta.
//!
//! The delta is assembled in stages: keyword sentiment of the player's
//! message, a signature bonus from the reply, trait modifiers, a random
//! jitter, diminishing returns near the top of the scale, and a final clamp.
//! Clamping the resulting *level* is a separate step (`apply_delta`).

use heartline_core::sentiment;
use heartline_core::{CharacterProfile, CharacterTrait, MAX_AFFECTION};
use rand::Rng;

/// Largest change a single turn can make, in either direction.
pub const MAX_TURN_DELTA: i32 = 2;

/// Above this level any positive delta is capped at +1.
pub const DIMINISHING_RETURNS_ABOVE: u8 = 80;

/// Contributions before jitter and capping, kept apart for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffectionSignals {
    /// Compliment bonus after trait modifiers (>= 0).
    pub compliment: i32,
    /// Insult penalty after trait modifiers (<= 0).
    pub insult: i32,
    /// Signature bonus after trait modifiers (>= 0).
    pub signature: i32,
}

impl AffectionSignals {
    /// Read the signals of one exchange for a given character.
    pub fn read(user_text: &str, response_text: &str, profile: &CharacterProfile) -> Self {
        let hits = sentiment::scan(user_text);

        let mut compliment = i32::from(hits.positive);
        let mut insult = -i32::from(hits.negative);
        let mut signature = i32::from(profile.has_signature(response_text));

        if profile.has_trait(CharacterTrait::Arrogant) {
            compliment = 0;
        } else if profile.has_trait(CharacterTrait::Warm) {
            compliment *= 2;
        }
        if profile.has_trait(CharacterTrait::Sensitive) {
            insult *= 2;
        }
        if profile.has_trait(CharacterTrait::Stoic) {
            signature = 0;
        }

        Self {
            compliment,
            insult,
            signature,
        }
    }

    pub fn sum(&self) -> i32 {
        self.compliment + self.insult + self.signature
    }
}

/// Draw the jitter term, uniform over {-1, 0, +1}.
pub fn draw_jitter<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.gen_range(-1..=1)
}

/// Combine signals and an already drawn jitter into the final turn delta.
pub fn settle_delta(signals: AffectionSignals, jitter: i32, current_level: u8) -> i32 {
    let mut total = signals.sum() + jitter;
    if current_level > DIMINISHING_RETURNS_ABOVE && total > 0 {
        total = total.min(1);
    }
    total.clamp(-MAX_TURN_DELTA, MAX_TURN_DELTA)
}

/// Affection change for one exchange, always within `[-2, 2]`.
///
/// `rng` is used for the jitter draw only; pass a seeded `StdRng` for
/// reproducible results.
pub fn compute_affection_delta<R: Rng + ?Sized>(
    user_text: &str,
    response_text: &str,
    current_level: u8,
    profile: &CharacterProfile,
    rng: &mut R,
) -> i32 {
    let signals = AffectionSignals::read(user_text, response_text, profile);
    let jitter = draw_jitter(rng);
    let delta = settle_delta(signals, jitter, current_level);
    tracing::trace!(?signals, jitter, current_level, delta, "affection delta");
    delta
}

/// Add `delta` to `level`, clamping the sum into `[0, 100]`.
pub fn apply_delta(level: u8, delta: i32) -> u8 {
    (i32::from(level) + delta).clamp(0, i32::from(MAX_AFFECTION)) as u8
}
