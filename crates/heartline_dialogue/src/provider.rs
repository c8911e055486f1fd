use anyhow::Result;
use async_trait::async_trait;
use heartline_core::{CharacterProfile, DialogueEntry, RelationshipRecord};

/// Everything a provider may use to write the character's next line.
#[derive(Debug, Clone, Copy)]
pub struct ConversationRequest<'a> {
    pub profile: &'a CharacterProfile,
    /// State before this turn is applied.
    pub record: &'a RelationshipRecord,
    pub message: &'a str,
    /// Recent dialogue, oldest first.
    pub history: &'a [DialogueEntry],
}

/// Source of character dialogue: an AI completion endpoint or a static table.
#[async_trait]
pub trait ConversationProvider: Send + Sync {
    async fn respond(&self, request: &ConversationRequest<'_>) -> Result<String>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
