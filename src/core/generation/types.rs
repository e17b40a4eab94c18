//! Generation Result Types
//!
//! Records for one generation attempt per (model, content type) pair, with
//! forward-only status transitions and a per-pair version history for
//! regenerate/compare workflows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cost::TokenUsage;
use crate::core::workflow::types::ContentType;

// ============================================================================
// Status
// ============================================================================

/// Lifecycle of one generation attempt. Transitions only move forward:
/// `Pending → Generating → {Completed | Error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    Generating,
    Completed,
    Error,
}

impl GenerationStatus {
    /// Whether moving to `next` is a legal forward transition.
    pub fn can_transition(self, next: GenerationStatus) -> bool {
        matches!(
            (self, next),
            (GenerationStatus::Pending, GenerationStatus::Generating)
                | (GenerationStatus::Generating, GenerationStatus::Completed)
                | (GenerationStatus::Generating, GenerationStatus::Error)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationStatus::Completed | GenerationStatus::Error)
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStatus::Pending => write!(f, "pending"),
            GenerationStatus::Generating => write!(f, "generating"),
            GenerationStatus::Completed => write!(f, "completed"),
            GenerationStatus::Error => write!(f, "error"),
        }
    }
}

// ============================================================================
// Pair Key
// ============================================================================

/// Identifies one (model, content type) result slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub model_id: String,
    pub content_type: ContentType,
}

impl PairKey {
    pub fn new(model_id: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            model_id: model_id.into(),
            content_type,
        }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.model_id, self.content_type)
    }
}

// ============================================================================
// Records
// ============================================================================

/// Successful generation payload with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub text: String,
    pub usage: TokenUsage,
    pub cost_usd: f64,
    pub latency_ms: u64,
    /// Resolved model name reported by the provider.
    pub model_name: String,
    pub provider: String,
}

/// One generation attempt for a pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Unique record identifier.
    pub id: String,
    pub status: GenerationStatus,
    /// Present once `status == Completed`.
    pub output: Option<GenerationOutput>,
    /// Human-readable message, present once `status == Error`.
    pub error: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl GenerationRecord {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            status: GenerationStatus::Pending,
            output: None,
            error: None,
            requested_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Mark the request as issued.
    pub fn begin(&mut self) -> Result<(), GenerationError> {
        self.transition(GenerationStatus::Generating)
    }

    /// Store a successful result.
    pub fn complete(&mut self, output: GenerationOutput) -> Result<(), GenerationError> {
        self.transition(GenerationStatus::Completed)?;
        self.output = Some(output);
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Store a failure message.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), GenerationError> {
        self.transition(GenerationStatus::Error)?;
        self.error = Some(message.into());
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: GenerationStatus) -> Result<(), GenerationError> {
        if !self.status.can_transition(next) {
            return Err(GenerationError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

impl Default for GenerationRecord {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Pair History
// ============================================================================

/// Version list for one pair: every attempt is retained (oldest first,
/// bounded), and `current` selects which version is displayed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairHistory {
    versions: Vec<GenerationRecord>,
    current: usize,
}

impl PairHistory {
    /// Append a new version and make it current. When the cap is reached
    /// the oldest version is dropped.
    pub fn push(&mut self, record: GenerationRecord, max_versions: usize) {
        if self.versions.len() >= max_versions.max(1) {
            self.versions.remove(0);
        }
        self.versions.push(record);
        self.current = self.versions.len() - 1;
    }

    pub fn versions(&self) -> &[GenerationRecord] {
        &self.versions
    }

    /// The currently displayed version.
    pub fn current(&self) -> Option<&GenerationRecord> {
        self.versions.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The most recently appended version.
    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.versions.last()
    }

    /// Make an older version current without discarding newer ones.
    pub fn select(&mut self, index: usize) -> Result<(), GenerationError> {
        if index >= self.versions.len() {
            return Err(GenerationError::VersionOutOfRange {
                index,
                len: self.versions.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Mutable access to a version by record id.
    pub fn record_mut(&mut self, record_id: &str) -> Option<&mut GenerationRecord> {
        self.versions.iter_mut().find(|r| r.id == record_id)
    }

    /// Whether any version completed successfully.
    pub fn has_completed(&self) -> bool {
        self.versions
            .iter()
            .any(|r| r.status == GenerationStatus::Completed)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during generation bookkeeping.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("no results recorded for pair {0}")]
    PairNotFound(String),

    #[error("version index {index} out of range (history has {len})")]
    VersionOutOfRange { index: usize, len: usize },

    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: GenerationStatus,
        to: GenerationStatus,
    },
}

// ============================================================================
// Tests
// ============================================================================
