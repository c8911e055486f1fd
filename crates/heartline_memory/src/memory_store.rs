//! In-process store for tests and throwaway sessions.

use crate::store::{tail, RelationshipStore, Result, StoreError};
use async_trait::async_trait;
use heartline_core::{DialogueEntry, PairKey, PlayerId, RelationshipRecord};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Slot {
    record: Option<RelationshipRecord>,
    dialogue: Vec<DialogueEntry>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<PairKey, Slot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn load(&self, key: &PairKey) -> Result<Option<RelationshipRecord>> {
        let slots = self.slots.read().await;
        Ok(slots.get(key).and_then(|s| s.record.clone()))
    }

    async fn save(&self, key: &PairKey, record: &RelationshipRecord) -> Result<()> {
        if record.character != key.character {
            return Err(StoreError::Mismatch(key.clone()));
        }
        let mut slots = self.slots.write().await;
        slots.entry(key.clone()).or_default().record = Some(record.clone());
        Ok(())
    }

    async fn append_dialogue(&self, key: &PairKey, entries: &[DialogueEntry]) -> Result<()> {
        let mut slots = self.slots.write().await;
        slots
            .entry(key.clone())
            .or_default()
            .dialogue
            .extend_from_slice(entries);
        Ok(())
    }

    async fn recent_dialogue(&self, key: &PairKey, limit: usize) -> Result<Vec<DialogueEntry>> {
        let slots = self.slots.read().await;
        Ok(slots
            .get(key)
            .map(|s| tail(&s.dialogue, limit))
            .unwrap_or_default())
    }

    async fn list_for_player(&self, player: &PlayerId) -> Result<Vec<RelationshipRecord>> {
        let slots = self.slots.read().await;
        let mut records: Vec<RelationshipRecord> = slots
            .iter()
            .filter(|(k, _)| &k.player == player)
            .filter_map(|(_, s)| s.record.clone())
            .collect();
        records.sort_by_key(|r| r.character);
        Ok(records)
    }

    async fn reset(&self, key: &PairKey) -> Result<bool> {
        let mut slots = self.slots.write().await;
        Ok(slots.remove(key).is_some())
    }

    async fn delete_player(&self, player: &PlayerId) -> Result<usize> {
        let mut slots = self.slots.write().await;
        let before = slots
            .iter()
            .filter(|(k, s)| &k.player == player && s.record.is_some())
            .count();
        slots.retain(|k, _| &k.player != player);
        Ok(before)
    }
}
