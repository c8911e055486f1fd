//! File-backed store.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/<player>/<character>.json            relationship record
//! <data_dir>/<player>/<character>.dialogue.jsonl  dialogue log, one entry per line
//! ```
//!
//! Records are written to a temporary file and renamed into place so a crash
//! mid-write leaves the previous snapshot intact.

use crate::store::{tail, RelationshipStore, Result, StoreError};
use async_trait::async_trait;
use heartline_core::{CharacterId, DialogueEntry, PairKey, PlayerId, RelationshipRecord};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn player_dir(&self, player: &PlayerId) -> Result<PathBuf> {
        validate_player(player)?;
        Ok(self.root.join(player.as_str()))
    }

    fn record_path(&self, key: &PairKey) -> Result<PathBuf> {
        Ok(self
            .player_dir(&key.player)?
            .join(format!("{}.json", key.character)))
    }

    fn dialogue_path(&self, key: &PairKey) -> Result<PathBuf> {
        Ok(self
            .player_dir(&key.player)?
            .join(format!("{}.dialogue.jsonl", key.character)))
    }
}

/// Player ids become directory names, so only a safe subset is accepted.
fn validate_player(player: &PlayerId) -> Result<()> {
    let id = player.as_str();
    let ok = !id.is_empty()
        && id.len() <= 64
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidPlayer(id.to_string()))
    }
}

/// Read a saved record. Hand-edited or stale saves are repaired so the level
/// stays in range and the tier matches it.
async fn read_record(path: &Path) -> Result<Option<RelationshipRecord>> {
    match fs::read(path).await {
        Ok(bytes) => {
            let mut record: RelationshipRecord = serde_json::from_slice(&bytes)?;
            if record.repair() {
                tracing::warn!(
                    "Repaired out-of-range record in {} (now affection {}, {})",
                    path.display(),
                    record.affection_level,
                    record.relationship_tier
                );
            }
            Ok(Some(record))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl RelationshipStore for JsonFileStore {
    async fn load(&self, key: &PairKey) -> Result<Option<RelationshipRecord>> {
        let record = read_record(&self.record_path(key)?).await?;
        match record {
            Some(r) if r.character != key.character => Err(StoreError::Mismatch(key.clone())),
            other => Ok(other),
        }
    }

    async fn save(&self, key: &PairKey, record: &RelationshipRecord) -> Result<()> {
        if record.character != key.character {
            return Err(StoreError::Mismatch(key.clone()));
        }
        let path = self.record_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        tracing::debug!("Saved {} to {}", key, path.display());
        Ok(())
    }

    async fn append_dialogue(&self, key: &PairKey, entries: &[DialogueEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let path = self.dialogue_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut buf = Vec::new();
        for entry in entries {
            serde_json::to_writer(&mut buf, entry)?;
            buf.push(b'\n');
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&buf).await?;
        file.flush().await?;
        Ok(())
    }

    async fn recent_dialogue(&self, key: &PairKey, limit: usize) -> Result<Vec<DialogueEntry>> {
        let path = self.dialogue_path(key)?;
        let content = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut log = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DialogueEntry>(line) {
                Ok(entry) => log.push(entry),
                Err(e) => tracing::warn!("Skipping bad dialogue line {} in {}: {}", n + 1, path.display(), e),
            }
        }
        Ok(tail(&log, limit))
    }

    async fn list_for_player(&self, player: &PlayerId) -> Result<Vec<RelationshipRecord>> {
        let dir = self.player_dir(player)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.parse::<CharacterId>().is_err() {
                tracing::warn!("Ignoring unknown save file {}", path.display());
                continue;
            }
            if let Some(record) = read_record(&path).await? {
                records.push(record);
            }
        }
        records.sort_by_key(|r| r.character);
        Ok(records)
    }

    async fn reset(&self, key: &PairKey) -> Result<bool> {
        let had_record = remove_if_exists(&self.record_path(key)?).await?;
        let had_log = remove_if_exists(&self.dialogue_path(key)?).await?;
        if had_record || had_log {
            tracing::debug!("Removed save files of {}", key);
        }
        Ok(had_record || had_log)
    }

    async fn delete_player(&self, player: &PlayerId) -> Result<usize> {
        let count = self.list_for_player(player).await?.len();
        let dir = self.player_dir(player)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::debug!("Removed {} for player {}", dir.display(), player);
                Ok(count)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
