use crate::provider::{ConversationProvider, ConversationRequest};
use crate::providers::static_lines::StaticProvider;
use anyhow::Result;
use std::sync::Arc;

/// Tries the primary provider and drops to static lines when it fails or
/// returns nothing.
pub struct FallbackProvider {
    primary: Arc<dyn ConversationProvider>,
    fallback: StaticProvider,
}

impl FallbackProvider {
    pub fn new(primary: Arc<dyn ConversationProvider>) -> Self {
        Self {
            primary,
            fallback: StaticProvider::new(),
        }
    }
}

#[async_trait::async_trait]
impl ConversationProvider for FallbackProvider {
    async fn respond(&self, request: &ConversationRequest<'_>) -> Result<String> {
        match self.primary.respond(request).await {
            Ok(reply) if !reply.trim().is_empty() => Ok(reply),
            Ok(_) => {
                tracing::warn!(
                    "{} returned an empty reply for {}, using static lines",
                    self.primary.name(),
                    request.profile.id
                );
                self.fallback.respond(request).await
            }
            Err(e) => {
                tracing::warn!(
                    "{} failed for {}, using static lines: {:#}",
                    self.primary.name(),
                    request.profile.id,
                    e
                );
                self.fallback.respond(request).await
            }
        }
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}
