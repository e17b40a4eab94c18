//! Workflow Domain Types
//!
//! Defines the core domain types for the news-generation configuration
//! workflow:
//! - [`DataMode`]: which section catalog is visible downstream
//! - [`SectionInfo`]: a selectable chunk of structured financial data
//! - [`ContentType`]: the three audiences with independent prompt templates
//! - [`ModelSelection`]: chosen models plus shared generation settings
//! - [`PublishState`]: draft/validated/published plus the monotonic version
//! - [`WorkflowError`]: error types for workflow operations
//!
//! All types implement `Serialize` and `Deserialize` for session persistence
//! and for the JSON boundary with the configuration API.

use serde::{Deserialize, Serialize};

// ============================================================================
// Data Mode
// ============================================================================

/// Which data pipeline feeds the section catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataMode {
    /// Existing data only: a single non-reorderable pseudo-section.
    Old,
    /// Newly generated structured data.
    New,
    /// Both pipelines combined.
    OldNew,
}

impl Default for DataMode {
    fn default() -> Self {
        DataMode::New
    }
}

impl std::fmt::Display for DataMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataMode::Old => write!(f, "OLD"),
            DataMode::New => write!(f, "NEW"),
            DataMode::OldNew => write!(f, "OLD_NEW"),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Origin pipeline of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionSource {
    Old,
    New,
}

/// A named chunk of structured financial data that can be included
/// in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    /// Catalog identifier, referenced by `{{id}}` placeholders.
    pub id: String,
    /// Human-readable title (e.g., "Cash Flow").
    pub title: String,
    /// Which pipeline produced this section.
    pub source: SectionSource,
}

impl SectionInfo {
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: SectionSource) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source,
        }
    }

    /// Whether this section is visible under the given data mode.
    pub fn visible_in(&self, mode: DataMode) -> bool {
        match mode {
            DataMode::Old => self.source == SectionSource::Old,
            DataMode::New => self.source == SectionSource::New,
            DataMode::OldNew => true,
        }
    }
}

// ============================================================================
// Content Types
// ============================================================================

/// One of the three audiences with independent prompt templates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Subscriber-facing content. Always enabled.
    Paid,
    /// Free-tier content.
    Unpaid,
    /// Search-crawler-facing content.
    Crawler,
}

impl ContentType {
    /// All content types, in canonical display order.
    pub fn all() -> [ContentType; 3] {
        [ContentType::Paid, ContentType::Unpaid, ContentType::Crawler]
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Paid => write!(f, "paid"),
            ContentType::Unpaid => write!(f, "unpaid"),
            ContentType::Crawler => write!(f, "crawler"),
        }
    }
}

// ============================================================================
// Model Selection
// ============================================================================

/// Selected model identifiers plus shared generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSelection {
    /// Model identifiers, deduplicated, in selection order.
    pub models: Vec<String>,
    /// Shared sampling temperature.
    pub temperature: f32,
    /// Shared max output tokens.
    pub max_tokens: u32,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

impl ModelSelection {
    /// Add a model id; no-op if already selected.
    pub fn add(&mut self, model_id: impl Into<String>) {
        let model_id = model_id.into();
        if !self.models.contains(&model_id) {
            self.models.push(model_id);
        }
    }

    /// Remove a model id; no-op if not selected.
    pub fn remove(&mut self, model_id: &str) {
        self.models.retain(|m| m != model_id);
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.models.iter().any(|m| m == model_id)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

// ============================================================================
// Publish State
// ============================================================================

/// Lifecycle status of a configuration draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// In-progress, unpublished configuration.
    #[default]
    Draft,
    /// Passed the publish checklist but not yet published.
    Validated,
    /// Active, production configuration.
    Published,
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishStatus::Draft => write!(f, "draft"),
            PublishStatus::Validated => write!(f, "validated"),
            PublishStatus::Published => write!(f, "published"),
        }
    }
}

/// Publish status plus the monotonically increasing published version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishState {
    pub status: PublishStatus,
    /// 0 until first published, then incremented by exactly 1 per publish.
    pub version: u32,
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WorkflowError {
    #[error("the paid content type is always enabled and cannot be disabled")]
    PaidTypeRequired,

    #[error("trigger/stock identifiers are locked once generation has started; reset the draft first")]
    IdentifiersLocked,
}

// ============================================================================
// Draft Summary
// ============================================================================

/// Lightweight projection of a draft for listing in-progress work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSummary {
    pub id: String,
    pub trigger_id: String,
    pub stock_id: String,
    pub data_mode: DataMode,
    pub selected_section_count: usize,
    pub enabled_types: Vec<ContentType>,
    pub model_count: usize,
    pub status: PublishStatus,
    pub version: u32,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// Tests
// ============================================================================
