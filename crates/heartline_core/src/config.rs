use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeartlineConfig {
    pub ai: AiConfig,
    pub storage: StorageConfig,
    pub roster: RosterConfig,
    pub engine: EngineConfig,
}

impl HeartlineConfig {
    /// Read a TOML file; absent fields keep their defaults. `HEARTLINE_*`
    /// variables are applied on top.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: HeartlineConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Like [`HeartlineConfig::load`], but a missing or broken file yields the
    /// defaults (still with env overrides).
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("HEARTLINE_AI_KEY").or_else(|_| std::env::var("OPENAI_API_KEY")) {
            if !v.trim().is_empty() {
                self.ai.api_key = Some(v);
            }
        }
        if let Ok(v) = std::env::var("HEARTLINE_AI_MODEL") {
            self.ai.model = v;
        }
        if let Ok(v) = std::env::var("HEARTLINE_AI_BASE_URL") {
            self.ai.base_url = v;
        }
        if let Ok(v) = std::env::var("HEARTLINE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("HEARTLINE_SEED") {
            if let Ok(n) = v.parse() {
                self.engine.seed = Some(n);
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Without a key the game uses the static fallback lines.
    pub api_key: Option<String>,
    pub model: String,
    /// OpenAI-compatible endpoint, without the trailing `/chat/completions`.
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 300,
            temperature: 0.8,
            timeout_secs: 30,
            max_attempts: 3,
        }
    }
}

impl AiConfig {
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one save file per player x character pair.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("heartline_data"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Custom roster file. `None` uses the built-in roster.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed seed for the affection jitter. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// How many dialogue lines are handed to the conversation provider.
    pub history_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            history_window: 12,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
