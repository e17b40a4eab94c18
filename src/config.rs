use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub history: HistoryConfig,
    pub data: DataConfig,
}

/// Defaults applied to generation requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Default sampling temperature for new drafts.
    pub temperature: f32,
    /// Default max output tokens for new drafts.
    pub max_tokens: u32,
    /// Timeout applied to outbound generation requests, in seconds.
    pub request_timeout_secs: u64,
    /// Base URL of the backing configuration/generation API.
    pub api_base_url: String,
}

/// Caps for the bounded histories kept in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Undo stack depth per prompt draft.
    pub prompt_undo_depth: usize,
    /// Maximum retained generation versions per (model, content type) pair.
    pub max_result_versions: usize,
    /// Maximum draft snapshots retained by the session store.
    pub max_draft_snapshots: usize,
}

/// Data directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            history: HistoryConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
            request_timeout_secs: 300,
            api_base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            prompt_undo_depth: 10,
            max_result_versions: 20,
            max_draft_snapshots: 50,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { data_dir: None }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/copydesk/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, with the same
    /// missing/unparseable fallback behavior as [`Self::load`].
    pub fn load_from(config_path: &std::path::Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("copydesk"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("copydesk").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
