mod fallback;
mod openai;
mod static_lines;

pub use fallback::FallbackProvider;
pub use openai::OpenAiProvider;
pub use static_lines::StaticProvider;

use crate::provider::ConversationProvider;
use anyhow::Result;
use heartline_core::config::AiConfig;
use std::sync::Arc;

/// Choose the dialogue source for this run.
///
/// Without an API key, or when `offline` is set, characters speak from their
/// static line tables. Otherwise the completion endpoint is used with static
/// lines as the fallback.
pub fn build_provider(config: &AiConfig, offline: bool) -> Result<Arc<dyn ConversationProvider>> {
    if offline {
        tracing::info!("Offline mode, using static dialogue");
        return Ok(Arc::new(StaticProvider::new()));
    }
    if !config.has_key() {
        tracing::info!("No AI key configured, using static dialogue");
        return Ok(Arc::new(StaticProvider::new()));
    }

    let primary = OpenAiProvider::new(config)?;
    tracing::info!("Using {} at {}", config.model, config.base_url);
    Ok(Arc::new(FallbackProvider::new(Arc::new(primary))))
}
