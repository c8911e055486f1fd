use async_trait::async_trait;
use heartline_core::{DialogueEntry, PairKey, PlayerId, RelationshipRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid player id: {0:?}")]
    InvalidPlayer(String),

    #[error("Save for {0} does not match its key")]
    Mismatch(PairKey),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage for relationship records and dialogue logs, keyed by player x
/// character.
///
/// Implementations do not coordinate concurrent writers; callers that do
/// read-modify-write cycles hold a [`crate::PairLocks`] guard around them.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    async fn load(&self, key: &PairKey) -> Result<Option<RelationshipRecord>>;

    async fn save(&self, key: &PairKey, record: &RelationshipRecord) -> Result<()>;

    async fn append_dialogue(&self, key: &PairKey, entries: &[DialogueEntry]) -> Result<()>;

    /// Up to `limit` most recent entries, oldest first.
    async fn recent_dialogue(&self, key: &PairKey, limit: usize) -> Result<Vec<DialogueEntry>>;

    /// Every record the player has, ordered by character.
    async fn list_for_player(&self, player: &PlayerId) -> Result<Vec<RelationshipRecord>>;

    /// Forget one relationship and its dialogue. Returns whether anything existed.
    async fn reset(&self, key: &PairKey) -> Result<bool>;

    /// Forget every relationship of a player. Returns how many were removed.
    async fn delete_player(&self, player: &PlayerId) -> Result<usize>;
}

/// Keep only the last `limit` entries of `log`.
pub(crate) fn tail(log: &[DialogueEntry], limit: usize) -> Vec<DialogueEntry> {
    let start = log.len().saturating_sub(limit);
    log[start..].to_vec()
}
