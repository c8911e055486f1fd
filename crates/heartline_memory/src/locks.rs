//! Per-pair turn serialization.

use heartline_core::PairKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async mutexes, one per player x character pair.
///
/// Holding the guard returned by [`PairLocks::lock`] makes a load-update-save
/// cycle exclusive for that pair while other pairs proceed in parallel.
#[derive(Debug, Default)]
pub struct PairLocks {
    inner: Mutex<HashMap<PairKey, Arc<AsyncMutex<()>>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &PairKey) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
            // Drop entries nobody is waiting on so the map does not grow forever.
            map.retain(|_, m| Arc::strong_count(m) > 1);
            map.entry(key.clone()).or_default().clone()
        };
        slot.lock_owned().await
    }
}
