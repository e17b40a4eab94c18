//! Generation Comparator
//!
//! Issues one async generation request per (model, enabled content type)
//! pair and records results for side-by-side comparison. Pairs proceed
//! concurrently and fail independently: partial completion is an expected,
//! displayed state. An in-flight guard keeps at most one outstanding
//! request per pair, so no two writers ever race on the same result slot.

pub mod cost;
pub mod provider;
pub mod types;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::core::workflow::types::ContentType;

pub use cost::{ModelPricing, TokenUsage};
pub use provider::{GenerationProvider, GenerationRequest, ProviderError};
pub use types::{
    GenerationError, GenerationOutput, GenerationRecord, GenerationStatus, PairHistory, PairKey,
};

/// Default cap on retained versions per pair.
pub const DEFAULT_MAX_VERSIONS: usize = 20;

type ResultMap = HashMap<PairKey, PairHistory>;

// ============================================================================
// Generation Plan
// ============================================================================

/// Snapshot of the (model × enabled type) matrix to generate, built from a
/// draft by [`crate::core::workflow::WorkflowDraft::generation_plan`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationPlan {
    pub requests: Vec<GenerationRequest>,
}

impl GenerationPlan {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn pairs(&self) -> Vec<PairKey> {
        self.requests
            .iter()
            .map(|r| PairKey::new(r.model_id.clone(), r.content_type))
            .collect()
    }
}

// ============================================================================
// Exported Results
// ============================================================================

/// Serializable projection of one pair's history, for session snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairResults {
    pub model_id: String,
    pub content_type: ContentType,
    pub history: PairHistory,
}

// ============================================================================
// Comparator
// ============================================================================

/// Concurrent result bookkeeping for all (model, content type) pairs.
pub struct GenerationComparator {
    provider: Arc<dyn GenerationProvider>,
    results: Arc<RwLock<ResultMap>>,
    in_flight: Arc<Mutex<HashSet<PairKey>>>,
    max_versions: usize,
}

impl GenerationComparator {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider,
            results: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            max_versions: DEFAULT_MAX_VERSIONS,
        }
    }

    pub fn with_max_versions(mut self, max_versions: usize) -> Self {
        self.max_versions = max_versions.max(1);
        self
    }

    /// Launch one request per planned pair that is not already in flight.
    /// Returns the pairs actually launched. Requests run as detached tasks;
    /// poll [`Self::status`] or [`Self::wait_idle`] to observe progress.
    pub async fn generate_all(&self, plan: &GenerationPlan) -> Vec<PairKey> {
        let mut launched = Vec::new();
        for request in &plan.requests {
            let key = PairKey::new(request.model_id.clone(), request.content_type);
            if self.launch(request.clone()).await {
                launched.push(key);
            }
        }
        log::info!(
            "generation: launched {}/{} planned pairs",
            launched.len(),
            plan.len()
        );
        launched
    }

    /// Re-run a single pair, optionally with an override template,
    /// appending a new version rather than overwriting. Returns false if
    /// the pair already has a request in flight.
    pub async fn regenerate(
        &self,
        mut request: GenerationRequest,
        override_template: Option<String>,
    ) -> bool {
        if let Some(template) = override_template {
            request.template = template;
        }
        self.launch(request).await
    }

    /// Make an older version the displayed one without discarding newer
    /// versions.
    pub async fn select_version(
        &self,
        key: &PairKey,
        index: usize,
    ) -> Result<(), GenerationError> {
        let mut results = self.results.write().await;
        results
            .get_mut(key)
            .ok_or_else(|| GenerationError::PairNotFound(key.to_string()))?
            .select(index)
    }

    /// Status of the currently displayed version for a pair.
    pub async fn status(&self, key: &PairKey) -> Option<GenerationStatus> {
        let results = self.results.read().await;
        results.get(key).and_then(|h| h.current().map(|r| r.status))
    }

    /// Clone of a pair's full history.
    pub async fn history(&self, key: &PairKey) -> Option<PairHistory> {
        self.results.read().await.get(key).cloned()
    }

    /// Content types with at least one completed result on any model.
    pub async fn completed_types(&self) -> HashSet<ContentType> {
        let results = self.results.read().await;
        results
            .iter()
            .filter(|(_, history)| history.has_completed())
            .map(|(key, _)| key.content_type)
            .collect()
    }

    /// Serializable snapshot of all pair histories.
    pub async fn export(&self) -> Vec<PairResults> {
        let results = self.results.read().await;
        results
            .iter()
            .map(|(key, history)| PairResults {
                model_id: key.model_id.clone(),
                content_type: key.content_type,
                history: history.clone(),
            })
            .collect()
    }

    /// Replace all histories from a snapshot. Intended for session
    /// restore, before any request is launched.
    pub async fn restore(&self, pairs: Vec<PairResults>) {
        let mut results = self.results.write().await;
        *results = pairs
            .into_iter()
            .map(|p| (PairKey::new(p.model_id, p.content_type), p.history))
            .collect();
    }

    /// Discard all results. Used by a full draft reset.
    pub async fn clear(&self) {
        self.results.write().await.clear();
    }

    /// Whether no requests are in flight.
    pub async fn is_idle(&self) -> bool {
        self.in_flight.lock().await.is_empty()
    }

    /// Wait until every in-flight request has resolved.
    pub async fn wait_idle(&self) {
        loop {
            if self.is_idle().await {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    /// Reserve the pair's slot and spawn the request task. Returns false
    /// when a request is already in flight for the pair.
    async fn launch(&self, request: GenerationRequest) -> bool {
        let key = PairKey::new(request.model_id.clone(), request.content_type);

        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(key.clone()) {
                log::debug!("generation already in flight for {key}, skipping");
                return false;
            }
        }

        let record = GenerationRecord::new();
        let record_id = record.id.clone();
        {
            let mut results = self.results.write().await;
            results
                .entry(key.clone())
                .or_default()
                .push(record, self.max_versions);
        }

        let provider = Arc::clone(&self.provider);
        let results = Arc::clone(&self.results);
        let in_flight = Arc::clone(&self.in_flight);
        let task_key = key;

        tokio::spawn(async move {
            Self::update_record(&results, &task_key, &record_id, |r| r.begin()).await;

            match provider.generate(&request).await {
                Ok(output) => {
                    Self::update_record(&results, &task_key, &record_id, |r| r.complete(output))
                        .await;
                }
                Err(e) => {
                    log::warn!("generation failed for {task_key}: {e}");
                    Self::update_record(&results, &task_key, &record_id, |r| r.fail(e.to_string()))
                        .await;
                }
            }

            in_flight.lock().await.remove(&task_key);
        });

        true
    }

    async fn update_record<F>(
        results: &RwLock<ResultMap>,
        key: &PairKey,
        record_id: &str,
        apply: F,
    ) where
        F: FnOnce(&mut GenerationRecord) -> Result<(), GenerationError>,
    {
        let mut guard = results.write().await;
        let record = guard
            .get_mut(key)
            .and_then(|history| history.record_mut(record_id));
        match record {
            Some(record) => {
                if let Err(e) = apply(record) {
                    log::warn!("ignoring illegal result update for {key}: {e}");
                }
            }
            // The version was pruned while the request was in flight
            None => log::debug!("result slot for {key} disappeared, dropping update"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
