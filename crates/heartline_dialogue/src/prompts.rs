//! Chat messages handed to the completion endpoint.

use crate::provider::ConversationRequest;
use heartline_core::Speaker;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// System prompt: persona plus the current relationship state.
pub fn system_prompt(request: &ConversationRequest<'_>) -> String {
    let profile = request.profile;
    let record = request.record;

    let mut prompt = format!(
        "You are {name}, a character in a dating simulator. Stay in character and reply \
         in one to three short sentences.\n\n{persona}\n\n\
         Relationship with the player: {tier} (affection {level}/100, {count} conversations so far).\n\
         Your current mood: {emotion}.",
        name = profile.name,
        persona = profile.persona.trim(),
        tier = record.relationship_tier,
        level = record.affection_level,
        count = record.conversation_count,
        emotion = record.current_emotion,
    );

    if !profile.signature_markers.is_empty() {
        prompt.push_str(&format!(
            "\nSignature habits you sometimes show: {}.",
            profile.signature_markers.join(", ")
        ));
    }

    let shared: Vec<&str> = profile
        .content
        .iter()
        .filter(|item| record.is_unlocked(&item.id))
        .map(|item| item.title.as_str())
        .collect();
    if !shared.is_empty() {
        prompt.push_str(&format!(
            "\nMoments you have already shared with the player: {}.",
            shared.join("; ")
        ));
    }
    prompt
}

/// Full message list: system prompt, history, then the new player message.
pub fn build_messages(request: &ConversationRequest<'_>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(ChatMessage {
        role: Role::System,
        content: system_prompt(request),
    });
    for entry in request.history {
        let role = match entry.speaker {
            Speaker::Player => Role::User,
            Speaker::Character => Role::Assistant,
        };
        messages.push(ChatMessage {
            role,
            content: entry.text.clone(),
        });
    }
    messages.push(ChatMessage {
        role: Role::User,
        content: request.message.to_string(),
    });
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartline_core::{CharacterId, ContentId, DialogueEntry, Emotion, RelationshipRecord, Roster};

    #[test]
    fn test_prompt_mentions_state_and_shared_content() {
        let roster = Roster::builtin().unwrap();
        let vex = roster.get(CharacterId::Vex).unwrap();
        let mut record = RelationshipRecord::new(CharacterId::Vex);
        record.affection_level = 30;
        record.relationship_tier = heartline_core::RelationshipTier::Acquaintance;
        record.unlocked_content_ids.insert(ContentId::new("vex_garage"));

        let request = ConversationRequest {
            profile: vex,
            record: &record,
            message: "hi",
            history: &[],
        };
        let prompt = system_prompt(&request);
        assert!(prompt.contains("You are Vex"));
        assert!(prompt.contains("Acquaintance"));
        assert!(prompt.contains("30/100"));
        assert!(prompt.contains("*burp*"));
        assert!(prompt.contains("The Garage"));
        assert!(!prompt.contains("Confession"));
    }

    #[test]
    fn test_messages_order() {
        let roster = Roster::builtin().unwrap();
        let marlow = roster.get(CharacterId::Marlow).unwrap();
        let record = RelationshipRecord::new(CharacterId::Marlow);
        let history = vec![
            DialogueEntry::player("one latte please"),
            DialogueEntry::character("coming up ~♪", Emotion::Happy, 1),
        ];
        let request = ConversationRequest {
            profile: marlow,
            record: &record,
            message: "thanks!",
            history: &history,
        };
        let messages = build_messages(&request);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].content, "thanks!");
    }
}
