//! One full relationship update: delta, level, tier, emotion, unlocks.

use crate::affection::{apply_delta, draw_jitter, settle_delta, AffectionSignals};
use crate::emotion::derive_emotion;
use crate::unlocks::evaluate_unlocks;
use chrono::Utc;
use heartline_core::{
    CharacterProfile, ContentId, InteractionEvent, RelationshipRecord, RelationshipTier,
};
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Result of applying one interaction to a record.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The new snapshot. The input record is left untouched.
    pub record: RelationshipRecord,
    pub delta: i32,
    pub previous_level: u8,
    pub previous_tier: RelationshipTier,
    /// Already merged into `record.unlocked_content_ids`.
    pub newly_unlocked: BTreeSet<ContentId>,
}

impl TurnOutcome {
    pub fn tier_changed(&self) -> bool {
        self.previous_tier != self.record.relationship_tier
    }

    /// `Greater` when the tier went up, `Less` when it went down.
    pub fn tier_direction(&self) -> Ordering {
        self.record.relationship_tier.cmp(&self.previous_tier)
    }
}

/// Apply an interaction, drawing the jitter from `rng`.
pub fn apply_turn<R: Rng + ?Sized>(
    record: &RelationshipRecord,
    event: &InteractionEvent,
    profile: &CharacterProfile,
    rng: &mut R,
) -> TurnOutcome {
    let jitter = draw_jitter(rng);
    apply_turn_with_jitter(record, event, profile, jitter)
}

/// Apply an interaction with an explicit jitter value in {-1, 0, 1}.
pub fn apply_turn_with_jitter(
    record: &RelationshipRecord,
    event: &InteractionEvent,
    profile: &CharacterProfile,
    jitter: i32,
) -> TurnOutcome {
    debug_assert_eq!(record.character, profile.id, "profile does not match record");

    let signals = AffectionSignals::read(&event.user_text, &event.response_text, profile);
    let delta = settle_delta(signals, jitter, record.affection_level);
    let level = apply_delta(record.affection_level, delta);
    let tier = RelationshipTier::from_affection(level);
    let emotion = derive_emotion(&event.response_text, delta, profile);
    let newly_unlocked = evaluate_unlocks(
        level,
        &record.unlocked_content_ids,
        &profile.content_thresholds(),
    );

    let mut next = record.clone();
    next.affection_level = level;
    next.relationship_tier = tier;
    next.current_emotion = emotion;
    next.conversation_count = record.conversation_count.saturating_add(1);
    next.unlocked_content_ids.extend(newly_unlocked.iter().cloned());
    next.updated_at = Utc::now();

    if tier != record.relationship_tier {
        tracing::info!(
            "{}: {} -> {} (affection {} -> {})",
            profile.id,
            record.relationship_tier,
            tier,
            record.affection_level,
            level
        );
    }
    for id in &newly_unlocked {
        tracing::info!("{}: unlocked {}", profile.id, id);
    }
    tracing::debug!(
        ?signals,
        jitter,
        delta,
        level,
        emotion = %emotion,
        "turn applied for {}",
        profile.id
    );

    TurnOutcome {
        record: next,
        delta,
        previous_level: record.affection_level,
        previous_tier: record.relationship_tier,
        newly_unlocked,
    }
}
