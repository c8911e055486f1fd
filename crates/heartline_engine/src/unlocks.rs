//! Threshold-gated content unlocks.

use heartline_core::ContentId;
use std::collections::{BTreeMap, BTreeSet};

/// Content ids that the given level unlocks and that are not unlocked yet.
///
/// Pure: merging the result into the record is the caller's job. Feeding the
/// merged set back in yields an empty result at the same level.
pub fn evaluate_unlocks(
    affection_level: u8,
    already_unlocked: &BTreeSet<ContentId>,
    thresholds: &BTreeMap<ContentId, u8>,
) -> BTreeSet<ContentId> {
    thresholds
        .iter()
        .filter(|(id, threshold)| affection_level >= **threshold && !already_unlocked.contains(*id))
        .map(|(id, _)| id.clone())
        .collect()
}
