//! Draft Session Persistence
//!
//! Stores draft snapshots so a half-finished configuration survives a
//! restart. Snapshots carry the full draft plus the recorded generation
//! histories; the store holds them in memory and, when configured with a
//! path, mirrors them to a JSON file.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::generation::PairResults;
use crate::core::workflow::{DraftSummary, WorkflowDraft};

/// Default cap on retained snapshots.
pub const DEFAULT_MAX_SNAPSHOTS: usize = 50;

// ============================================================================
// Snapshot
// ============================================================================

/// One persisted draft plus its recorded generation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub draft: WorkflowDraft,
    /// Exported comparator histories, restored on resume.
    pub results: Vec<PairResults>,
    pub saved_at: DateTime<Utc>,
}

impl DraftSnapshot {
    pub fn new(draft: WorkflowDraft, results: Vec<PairResults>) -> Self {
        Self {
            draft,
            results,
            saved_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> DraftSummary {
        self.draft.summary()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("draft not found: {0}")]
    NotFound(String),

    #[error("draft storage error: {0}")]
    Storage(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Draft Store
// ============================================================================

/// In-memory snapshot store with optional file persistence.
#[derive(Debug)]
pub struct DraftStore {
    /// Snapshots keyed by draft id
    snapshots: RwLock<HashMap<String, DraftSnapshot>>,
    /// File path for persistence
    storage_path: Option<PathBuf>,
    /// Maximum number of snapshots to retain
    max_snapshots: usize,
}

impl DraftStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
            storage_path: None,
            max_snapshots: DEFAULT_MAX_SNAPSHOTS,
        }
    }

    /// Create a store with file persistence
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut store = Self::new();
        store.storage_path = Some(path);
        store
    }

    pub fn with_max_snapshots(mut self, max_snapshots: usize) -> Self {
        self.max_snapshots = max_snapshots.max(1);
        self
    }

    /// Load snapshots from storage
    pub async fn load(&self) -> StoreResult<()> {
        if let Some(ref path) = self.storage_path {
            if path.exists() {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| StoreError::Storage(e.to_string()))?;

                let loaded: HashMap<String, DraftSnapshot> = serde_json::from_str(&content)
                    .map_err(|e| StoreError::Storage(e.to_string()))?;

                log::info!("loaded {} draft snapshot(s) from {}", loaded.len(), path.display());
                *self.snapshots.write().await = loaded;
            }
        }
        Ok(())
    }

    /// Save snapshots to storage
    pub async fn save(&self) -> StoreResult<()> {
        if let Some(ref path) = self.storage_path {
            let snapshots = self.snapshots.read().await;
            let content = serde_json::to_string_pretty(&*snapshots)
                .map_err(|e| StoreError::Storage(e.to_string()))?;

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Storage(e.to_string()))?;
            }

            tokio::fs::write(path, content)
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        Ok(())
    }

    /// Store a snapshot, replacing any existing one for the same draft.
    /// Prunes the oldest snapshot when the cap is reached.
    pub async fn store(&self, snapshot: DraftSnapshot) -> StoreResult<()> {
        let mut snapshots = self.snapshots.write().await;

        let id = snapshot.draft.id.clone();
        if !snapshots.contains_key(&id) && snapshots.len() >= self.max_snapshots {
            if let Some(oldest_id) = snapshots
                .iter()
                .min_by_key(|(_, s)| s.saved_at)
                .map(|(id, _)| id.clone())
            {
                log::debug!("snapshot cap reached, pruning draft {oldest_id}");
                snapshots.remove(&oldest_id);
            }
        }

        snapshots.insert(id, snapshot);
        drop(snapshots);

        self.save().await
    }

    /// Get a snapshot by draft id
    pub async fn get(&self, draft_id: &str) -> Option<DraftSnapshot> {
        self.snapshots.read().await.get(draft_id).cloned()
    }

    /// Remove a snapshot
    pub async fn remove(&self, draft_id: &str) -> StoreResult<()> {
        let removed = self.snapshots.write().await.remove(draft_id);
        if removed.is_none() {
            return Err(StoreError::NotFound(draft_id.to_string()));
        }
        self.save().await
    }

    /// Summaries of all stored drafts, most recently saved first
    pub async fn list(&self) -> Vec<DraftSummary> {
        let snapshots = self.snapshots.read().await;
        let mut entries: Vec<_> = snapshots.values().collect();
        entries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        entries.iter().map(|s| s.summary()).collect()
    }

    /// The most recently saved snapshot, if any
    pub async fn most_recent(&self) -> Option<DraftSnapshot> {
        let snapshots = self.snapshots.read().await;
        snapshots
            .values()
            .max_by_key(|s| s.saved_at)
            .cloned()
    }

    /// Default storage path under the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("copydesk").join("drafts.json"))
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
