//! Property-based tests for the relationship engine.
//!
//! Verifies that deltas, levels, tiers and unlock sets stay within their
//! documented bounds for arbitrary inputs and arbitrary sequences of turns.

use heartline_core::{
    CharacterId, CharacterProfile, CharacterTrait, InteractionEvent, RelationshipRecord,
    RelationshipTier, Roster, MAX_AFFECTION,
};
use heartline_engine::{
    apply_turn, apply_turn_with_jitter, compute_affection_delta, derive_tier, evaluate_unlocks,
    settle_delta, AffectionSignals,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Strategies
// ============================================================================

const WORDS: &[&str] = &[
    "you", "are", "amazing", "stupid", "thanks", "boring", "cute", "hate", "the", "garage",
    "*burp*", "um,", "~♪", "?", "love", "weird", "hello", "SHUT UP", "kind",
];

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..8).prop_map(|w| w.join(" "))
}

fn arb_traits() -> impl Strategy<Value = Vec<CharacterTrait>> {
    prop::collection::vec(
        prop::sample::select(vec![
            CharacterTrait::Arrogant,
            CharacterTrait::Warm,
            CharacterTrait::Sensitive,
            CharacterTrait::Stoic,
        ]),
        0..4,
    )
}

fn arb_profile() -> impl Strategy<Value = CharacterProfile> {
    (prop::sample::select(CharacterId::ALL.to_vec()), arb_traits()).prop_map(|(id, traits)| {
        let mut profile = Roster::builtin().unwrap().get(id).unwrap().clone();
        profile.traits.extend(traits);
        profile
    })
}

fn arb_signals() -> impl Strategy<Value = AffectionSignals> {
    (0i32..=2, -2i32..=0, 0i32..=1).prop_map(|(compliment, insult, signature)| AffectionSignals {
        compliment,
        insult,
        signature,
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The per-turn delta is always within [-2, 2].
    #[test]
    fn delta_always_bounded(
        user in arb_text(),
        reply in arb_text(),
        level in 0u8..=MAX_AFFECTION,
        profile in arb_profile(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let delta = compute_affection_delta(&user, &reply, level, &profile, &mut rng);
        prop_assert!((-2..=2).contains(&delta), "delta {} out of range", delta);
    }

    /// Above 80 a turn can add at most one point.
    #[test]
    fn diminishing_returns_near_the_top(
        signals in arb_signals(),
        jitter in -1i32..=1,
        level in 81u8..=MAX_AFFECTION,
    ) {
        prop_assert!(settle_delta(signals, jitter, level) <= 1);
    }

    /// Tier lookup is total and monotonic.
    #[test]
    fn tier_monotonic(a in 0u8..=MAX_AFFECTION, b in 0u8..=MAX_AFFECTION) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(derive_tier(lo) <= derive_tier(hi));
    }

    /// Feeding the unlock result back in yields nothing new.
    #[test]
    fn unlocks_idempotent(level in 0u8..=MAX_AFFECTION, profile in arb_profile()) {
        let table = profile.content_thresholds();
        let first = evaluate_unlocks(level, &Default::default(), &table);
        prop_assert!(evaluate_unlocks(level, &first, &table).is_empty());
        for id in &first {
            prop_assert!(table[id] <= level);
        }
    }

    /// Over any sequence of turns: the level stays in range, the tier always
    /// matches the level, the count goes up by one per turn and unlocked
    /// content is never lost.
    #[test]
    fn turn_sequences_keep_invariants(
        profile in arb_profile(),
        turns in prop::collection::vec((arb_text(), arb_text(), -1i32..=1), 1..60),
    ) {
        let mut record = RelationshipRecord::new(profile.id);
        for (i, (user, reply, jitter)) in turns.into_iter().enumerate() {
            let before = record.unlocked_content_ids.clone();
            let outcome = apply_turn_with_jitter(
                &record,
                &InteractionEvent::new(user, reply),
                &profile,
                jitter,
            );
            let next = outcome.record;
            prop_assert!(next.affection_level <= MAX_AFFECTION);
            prop_assert_eq!(next.relationship_tier, RelationshipTier::from_affection(next.affection_level));
            prop_assert_eq!(next.conversation_count as usize, i + 1);
            prop_assert!(before.is_subset(&next.unlocked_content_ids));
            prop_assert!(profile.emotions.allows(next.current_emotion));
            record = next;
        }
    }

    /// The same seed gives the same outcome.
    #[test]
    fn seeded_turns_reproducible(user in arb_text(), reply in arb_text(), seed in any::<u64>()) {
        let profile = Roster::builtin().unwrap().get(CharacterId::Marlow).unwrap().clone();
        let record = RelationshipRecord::new(CharacterId::Marlow);
        let event = InteractionEvent::new(user, reply);
        let a = apply_turn(&record, &event, &profile, &mut StdRng::seed_from_u64(seed));
        let b = apply_turn(&record, &event, &profile, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a.delta, b.delta);
        prop_assert_eq!(a.record.current_emotion, b.record.current_emotion);
    }
}
