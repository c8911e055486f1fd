//! Turn orchestration: provider reply, engine update, persistence.

use crate::provider::{ConversationProvider, ConversationRequest};
use anyhow::{Context, Result};
use heartline_core::{
    CharacterProfile, ContentItem, DialogueEntry, InteractionEvent, PairKey, PlayerId,
    RelationshipRecord, Roster,
};
use heartline_engine::{apply_turn_with_jitter, draw_jitter, TurnOutcome};
use heartline_memory::{PairLocks, RelationshipStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// What the player sees after one exchange.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub reply: String,
    pub outcome: TurnOutcome,
    /// Content unlocked by this turn, in threshold order.
    pub unlocked: Vec<ContentItem>,
    pub provider: String,
}

pub struct ConversationService {
    roster: Arc<Roster>,
    store: Arc<dyn RelationshipStore>,
    provider: Arc<dyn ConversationProvider>,
    locks: PairLocks,
    rng: Mutex<StdRng>,
    history_window: usize,
}

impl ConversationService {
    /// `seed` fixes the affection jitter sequence; `None` seeds from entropy.
    pub fn new(
        roster: Arc<Roster>,
        store: Arc<dyn RelationshipStore>,
        provider: Arc<dyn ConversationProvider>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            roster,
            store,
            provider,
            locks: PairLocks::new(),
            rng: Mutex::new(rng),
            history_window: 12,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn profile(&self, key: &PairKey) -> Result<&CharacterProfile> {
        self.roster
            .get(key.character)
            .with_context(|| format!("{} is not in the roster", key.character))
    }

    async fn load_or_new(&self, key: &PairKey) -> Result<RelationshipRecord> {
        let record = self
            .store
            .load(key)
            .await
            .with_context(|| format!("Failed to load relationship {}", key))?;
        Ok(record.unwrap_or_else(|| RelationshipRecord::new(key.character)))
    }

    fn next_jitter(&self) -> i32 {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        draw_jitter(&mut *rng)
    }

    /// Run one exchange for a player x character pair and persist the result.
    ///
    /// Turns on the same pair are serialized; the record read at the start is
    /// the one written back at the end. Once the record is saved the turn
    /// counts, even if appending to the dialogue log fails.
    pub async fn take_turn(&self, key: &PairKey, user_text: &str) -> Result<TurnReport> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            anyhow::bail!("Message is empty");
        }
        let profile = self.profile(key)?;

        let _guard = self.locks.lock(key).await;

        let record = self.load_or_new(key).await?;
        let history = self
            .store
            .recent_dialogue(key, self.history_window)
            .await
            .with_context(|| format!("Failed to read dialogue for {}", key))?;

        let request = ConversationRequest {
            profile,
            record: &record,
            message: user_text,
            history: &history,
        };
        let reply = self
            .provider
            .respond(&request)
            .await
            .with_context(|| format!("{} could not produce a reply", self.provider.name()))?;

        let event = InteractionEvent::new(user_text, reply.clone());
        let outcome = apply_turn_with_jitter(&record, &event, profile, self.next_jitter());

        // Saving the record commits the turn. A lost log line must not make
        // the caller retry a turn that already counted.
        self.store
            .save(key, &outcome.record)
            .await
            .with_context(|| format!("Failed to save relationship {}", key))?;
        let lines = [
            DialogueEntry::player(user_text),
            DialogueEntry::character(reply.clone(), outcome.record.current_emotion, outcome.delta),
        ];
        if let Err(e) = self.store.append_dialogue(key, &lines).await {
            tracing::warn!("Turn for {} saved but its dialogue was not logged: {}", key, e);
        }

        tracing::debug!(
            "{}: delta {:+}, affection {}, emotion {}",
            key,
            outcome.delta,
            outcome.record.affection_level,
            outcome.record.current_emotion
        );

        let unlocked = items_in_threshold_order(profile, |item| outcome.newly_unlocked.contains(&item.id));
        Ok(TurnReport {
            reply,
            outcome,
            unlocked,
            provider: self.provider.name().to_string(),
        })
    }

    /// Current record, or a fresh one if the pair has never talked.
    pub async fn status(&self, key: &PairKey) -> Result<RelationshipRecord> {
        self.profile(key)?;
        self.load_or_new(key).await
    }

    /// What the given exchange would do, without jitter and without saving.
    pub async fn preview(&self, key: &PairKey, user_text: &str, response_text: &str) -> Result<TurnOutcome> {
        let profile = self.profile(key)?;
        let record = self.load_or_new(key).await?;
        let event = InteractionEvent::new(user_text, response_text);
        Ok(apply_turn_with_jitter(&record, &event, profile, 0))
    }

    /// Content the player has unlocked with this character, in threshold order.
    pub async fn unlocked_content(&self, key: &PairKey) -> Result<Vec<ContentItem>> {
        let profile = self.profile(key)?;
        let record = self.load_or_new(key).await?;
        Ok(items_in_threshold_order(profile, |item| record.is_unlocked(&item.id)))
    }

    pub async fn history(&self, key: &PairKey, limit: usize) -> Result<Vec<DialogueEntry>> {
        self.profile(key)?;
        Ok(self.store.recent_dialogue(key, limit).await?)
    }

    /// Every relationship the player has started.
    pub async fn relationships(&self, player: &PlayerId) -> Result<Vec<RelationshipRecord>> {
        Ok(self.store.list_for_player(player).await?)
    }

    /// Forget one relationship. Returns whether there was anything to forget.
    pub async fn reset(&self, key: &PairKey) -> Result<bool> {
        self.profile(key)?;
        let _guard = self.locks.lock(key).await;
        let removed = self.store.reset(key).await?;
        if removed {
            tracing::info!("Reset relationship {}", key);
        }
        Ok(removed)
    }

    pub async fn delete_player(&self, player: &PlayerId) -> Result<usize> {
        let mut guards = Vec::new();
        for profile in self.roster.iter() {
            let key = PairKey::new(player.clone(), profile.id);
            guards.push(self.locks.lock(&key).await);
        }
        let removed = self.store.delete_player(player).await?;
        tracing::info!("Deleted {} relationship(s) of {}", removed, player);
        Ok(removed)
    }
}

fn items_in_threshold_order<F>(profile: &CharacterProfile, keep: F) -> Vec<ContentItem>
where
    F: Fn(&ContentItem) -> bool,
{
    let mut items: Vec<ContentItem> = profile.content.iter().filter(|i| keep(i)).cloned().collect();
    items.sort_by(|a, b| a.threshold.cmp(&b.threshold).then_with(|| a.id.cmp(&b.id)));
    items
}
