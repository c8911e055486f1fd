//! Plain-text rendering of engine and service results.

use heartline_core::{
    CharacterProfile, ContentItem, DialogueEntry, RelationshipRecord, Speaker, MAX_AFFECTION,
};
use heartline_dialogue::TurnReport;
use heartline_engine::TurnOutcome;
use std::cmp::Ordering;

const BAR_WIDTH: usize = 20;

fn affection_bar(level: u8) -> String {
    let filled = usize::from(level.min(MAX_AFFECTION)) * BAR_WIDTH / usize::from(MAX_AFFECTION);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn status(profile: &CharacterProfile, record: &RelationshipRecord) -> String {
    let mut out = format!(
        "{name}: {tier} {bar} {level}/100\n  mood: {emotion}, conversations: {count}",
        name = profile.name,
        tier = record.relationship_tier,
        bar = affection_bar(record.affection_level),
        level = record.affection_level,
        emotion = record.current_emotion,
        count = record.conversation_count,
    );
    match (record.relationship_tier.next(), record.points_to_next_tier()) {
        (Some(next), Some(points)) => {
            out.push_str(&format!("\n  {} more to reach {}", points, next));
        }
        _ => out.push_str("\n  highest tier reached"),
    }
    out.push_str(&format!(
        "\n  unlocked: {}/{}",
        record.unlocked_content_ids.len(),
        profile.content.len()
    ));
    out
}

fn tier_line(outcome: &TurnOutcome) -> Option<String> {
    match outcome.tier_direction() {
        Ordering::Greater => Some(format!(
            "  ♥ {} -> {}",
            outcome.previous_tier, outcome.record.relationship_tier
        )),
        Ordering::Less => Some(format!(
            "  ✗ {} -> {}",
            outcome.previous_tier, outcome.record.relationship_tier
        )),
        Ordering::Equal => None,
    }
}

pub fn unlocked_item(item: &ContentItem) -> String {
    format!("  ✦ {} (at {})\n    {}", item.title, item.threshold, item.body.trim())
}

pub fn turn(profile: &CharacterProfile, report: &TurnReport) -> String {
    let outcome = &report.outcome;
    let mut out = format!(
        "{} [{}]: {}\n  affection {:+} -> {}",
        profile.name,
        outcome.record.current_emotion,
        report.reply,
        outcome.delta,
        outcome.record.affection_level
    );
    if let Some(line) = tier_line(outcome) {
        out.push('\n');
        out.push_str(&line);
    }
    for item in &report.unlocked {
        out.push_str("\n  unlocked:\n");
        out.push_str(&unlocked_item(item));
    }
    out
}

pub fn preview(profile: &CharacterProfile, outcome: &TurnOutcome) -> String {
    let mut out = format!(
        "{}: affection {:+} ({} -> {}), emotion {}",
        profile.name,
        outcome.delta,
        outcome.previous_level,
        outcome.record.affection_level,
        outcome.record.current_emotion
    );
    if let Some(line) = tier_line(outcome) {
        out.push('\n');
        out.push_str(&line);
    }
    for id in &outcome.newly_unlocked {
        let title = profile.content_item(id).map(|i| i.title.as_str()).unwrap_or(id.as_str());
        out.push_str(&format!("\n  would unlock: {}", title));
    }
    out
}

pub fn history(profile: &CharacterProfile, entries: &[DialogueEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let time = entry.timestamp.format("%Y-%m-%d %H:%M");
            match entry.speaker {
                Speaker::Player => format!("{} you: {}", time, entry.text),
                Speaker::Character => format!("{} {}: {}", time, profile.name, entry.text),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
