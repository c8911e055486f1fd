//! # Heartline relationship engine
//!
//! Maps one conversational exchange onto a relationship record:
//!
//! 1. **Affection**: keyword sentiment, signature bonus, trait modifiers and
//!    jitter produce a delta in `[-2, 2]` ([`compute_affection_delta`]).
//! 2. **Tier**: derived from the clamped level alone ([`derive_tier`]).
//! 3. **Emotion**: first-match rules over the delta and the reply
//!    ([`derive_emotion`]).
//! 4. **Unlocks**: content whose threshold the level meets ([`evaluate_unlocks`]).
//!
//! Everything here is synchronous and free of shared state; the only source of
//! nondeterminism is the RNG handed in by the caller.

mod affection;
mod emotion;
mod turn;
mod unlocks;

pub use affection::{
    apply_delta, compute_affection_delta, draw_jitter, settle_delta, AffectionSignals,
    DIMINISHING_RETURNS_ABOVE, MAX_TURN_DELTA,
};
pub use emotion::derive_emotion;
pub use turn::{apply_turn, apply_turn_with_jitter, TurnOutcome};
pub use unlocks::evaluate_unlocks;

use heartline_core::RelationshipTier;

/// Tier for a level already clamped into `[0, 100]`.
pub fn derive_tier(affection_level: u8) -> RelationshipTier {
    RelationshipTier::from_affection(affection_level)
}
