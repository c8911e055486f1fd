//! Static provider: pre-written lines from the roster, no network.

use crate::provider::{ConversationProvider, ConversationRequest};
use anyhow::Result;
use heartline_core::{CharacterProfile, RelationshipTier};

#[derive(Debug, Clone, Default)]
pub struct StaticProvider;

impl StaticProvider {
    pub fn new() -> Self {
        Self
    }

    /// Pick a line for the given tier and turn number.
    ///
    /// The first exchange gets the greeting. After that lines rotate by turn
    /// count; an empty tier borrows from the nearest colder tier.
    pub fn line_for(profile: &CharacterProfile, tier: RelationshipTier, turn: u32) -> String {
        if turn == 0 && !profile.greeting.is_empty() {
            return profile.greeting.clone();
        }

        let lines = RelationshipTier::ALL
            .iter()
            .rev()
            .filter(|t| **t <= tier)
            .map(|t| profile.fallback.for_tier(*t))
            .find(|lines| !lines.is_empty());

        match lines {
            Some(lines) => lines[turn as usize % lines.len()].clone(),
            None => profile.greeting.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ConversationProvider for StaticProvider {
    async fn respond(&self, request: &ConversationRequest<'_>) -> Result<String> {
        Ok(Self::line_for(
            request.profile,
            request.record.relationship_tier,
            request.record.conversation_count,
        ))
    }

    fn name(&self) -> &str {
        "static"
    }
}
