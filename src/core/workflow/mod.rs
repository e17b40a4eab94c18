//! Workflow Draft
//!
//! [`WorkflowDraft`] is the in-progress configuration a user assembles
//! before publishing: trigger/stock identifiers, data mode, section
//! selection and ordering, per-content-type prompt templates, and model
//! selection. It is a plain synchronous aggregate; async concerns
//! (generation, persistence, the API boundary) live in sibling modules
//! and operate on data the draft hands out.

pub mod sections;
pub mod types;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::generation::{GenerationPlan, GenerationRequest};
use crate::core::prompts::placeholders::{self, PlaceholderReport};
use crate::core::prompts::{PromptDraft, PromptWorkspace};

pub use sections::SectionBoard;
pub use types::{
    ContentType, DataMode, DraftSummary, ModelSelection, PublishState, PublishStatus, SectionInfo,
    SectionSource, WorkflowError,
};

// ============================================================================
// Workflow Draft
// ============================================================================

/// One in-progress news-generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDraft {
    pub id: String,
    trigger_id: String,
    stock_id: String,
    data_mode: DataMode,
    sections: SectionBoard,
    /// Enabled content types. Paid is always a member.
    enabled_types: BTreeSet<ContentType>,
    prompts: PromptWorkspace,
    models: ModelSelection,
    publish: PublishState,
    /// Set when the first generation plan is built; locks trigger/stock so
    /// recorded results stay attributable to the inputs that produced them.
    locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowDraft {
    pub fn new(trigger_id: impl Into<String>, stock_id: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut enabled_types = BTreeSet::new();
        enabled_types.insert(ContentType::Paid);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            trigger_id: trigger_id.into(),
            stock_id: stock_id.into(),
            data_mode: DataMode::default(),
            sections: SectionBoard::new(),
            enabled_types,
            prompts: PromptWorkspace::default(),
            models: ModelSelection::default(),
            publish: PublishState::default(),
            locked: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Like [`Self::new`] but with undo depth and generation settings
    /// taken from the application config.
    pub fn with_config(
        trigger_id: impl Into<String>,
        stock_id: impl Into<String>,
        config: &crate::config::AppConfig,
    ) -> Self {
        let mut draft = Self::new(trigger_id, stock_id);
        draft.prompts = PromptWorkspace::new(config.history.prompt_undo_depth);
        draft.models.temperature = config.generation.temperature;
        draft.models.max_tokens = config.generation.max_tokens;
        draft
    }

    // ------------------------------------------------------------------
    // Identifiers
    // ------------------------------------------------------------------

    pub fn trigger_id(&self) -> &str {
        &self.trigger_id
    }

    pub fn stock_id(&self) -> &str {
        &self.stock_id
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_trigger(&mut self, trigger_id: impl Into<String>) -> Result<(), WorkflowError> {
        if self.locked {
            return Err(WorkflowError::IdentifiersLocked);
        }
        self.trigger_id = trigger_id.into();
        self.touch();
        Ok(())
    }

    pub fn set_stock(&mut self, stock_id: impl Into<String>) -> Result<(), WorkflowError> {
        if self.locked {
            return Err(WorkflowError::IdentifiersLocked);
        }
        self.stock_id = stock_id.into();
        self.touch();
        Ok(())
    }

    /// Unlock identifiers and return the draft to an unpublished state.
    /// Callers are responsible for discarding recorded results alongside.
    pub fn reset(&mut self) {
        self.locked = false;
        self.publish.status = PublishStatus::Draft;
        self.touch();
    }

    // ------------------------------------------------------------------
    // Data mode and sections
    // ------------------------------------------------------------------

    pub fn data_mode(&self) -> DataMode {
        self.data_mode
    }

    /// Switch data mode, deselecting sections no longer visible.
    pub fn set_data_mode(&mut self, mode: DataMode) {
        if self.data_mode == mode {
            return;
        }
        self.data_mode = mode;
        self.sections.retain_visible(mode);
        self.touch();
    }

    pub fn sections(&self) -> &SectionBoard {
        &self.sections
    }

    pub fn set_catalog(&mut self, catalog: Vec<SectionInfo>) {
        self.sections.set_catalog(catalog);
        self.touch();
    }

    pub fn select_section(&mut self, id: &str) {
        self.sections.select(id);
        self.touch();
    }

    pub fn deselect_section(&mut self, id: &str) {
        self.sections.deselect(id);
        self.touch();
    }

    pub fn select_all_sections(&mut self) {
        self.sections.select_all(self.data_mode);
        self.touch();
    }

    pub fn clear_sections(&mut self) {
        self.sections.clear_all();
        self.touch();
    }

    /// Reorder the output list. In OLD mode the single existing-data block
    /// is not reorderable, so this is a no-op.
    pub fn move_section(&mut self, from: usize, to: usize) {
        if self.data_mode == DataMode::Old {
            log::debug!("move_section ignored: OLD mode has a fixed layout");
            return;
        }
        self.sections.move_item(from, to);
        self.touch();
    }

    pub fn reset_section_order(&mut self) {
        self.sections.reset_order();
        self.touch();
    }

    // ------------------------------------------------------------------
    // Content types
    // ------------------------------------------------------------------

    /// Enabled content types in canonical display order.
    pub fn enabled_types(&self) -> Vec<ContentType> {
        ContentType::all()
            .into_iter()
            .filter(|t| self.enabled_types.contains(t))
            .collect()
    }

    pub fn is_type_enabled(&self, content_type: ContentType) -> bool {
        self.enabled_types.contains(&content_type)
    }

    pub fn enable_type(&mut self, content_type: ContentType) {
        if self.enabled_types.insert(content_type) {
            self.touch();
        }
    }

    /// Disable a content type. Paid cannot be disabled.
    pub fn disable_type(&mut self, content_type: ContentType) -> Result<(), WorkflowError> {
        if content_type == ContentType::Paid {
            return Err(WorkflowError::PaidTypeRequired);
        }
        if self.enabled_types.remove(&content_type) {
            self.touch();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------

    pub fn prompt(&self, content_type: ContentType) -> &str {
        self.prompts.content(content_type)
    }

    pub fn prompt_draft(&self, content_type: ContentType) -> Option<&PromptDraft> {
        self.prompts.draft(content_type)
    }

    pub fn set_prompt(&mut self, content_type: ContentType, text: &str) {
        self.prompts.set_content(content_type, text);
        self.touch();
    }

    pub fn undo_prompt(&mut self, content_type: ContentType) -> bool {
        let changed = self.prompts.undo(content_type);
        if changed {
            self.touch();
        }
        changed
    }

    pub fn redo_prompt(&mut self, content_type: ContentType) -> bool {
        let changed = self.prompts.redo(content_type);
        if changed {
            self.touch();
        }
        changed
    }

    /// Scan a content type's template for placeholder problems against
    /// the current section selection.
    pub fn validate_prompt(&self, content_type: ContentType) -> PlaceholderReport {
        placeholders::scan(self.prompts.content(content_type), &self.sections)
    }

    // ------------------------------------------------------------------
    // Models
    // ------------------------------------------------------------------

    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    pub fn add_model(&mut self, model_id: impl Into<String>) {
        self.models.add(model_id);
        self.touch();
    }

    pub fn remove_model(&mut self, model_id: &str) {
        self.models.remove(model_id);
        self.touch();
    }

    pub fn set_temperature(&mut self, temperature: f32) {
        self.models.temperature = temperature;
        self.touch();
    }

    pub fn set_max_tokens(&mut self, max_tokens: u32) {
        self.models.max_tokens = max_tokens;
        self.touch();
    }

    // ------------------------------------------------------------------
    // Generation and publish
    // ------------------------------------------------------------------

    /// Build the (model × enabled type) request matrix from the current
    /// draft state. A non-empty plan locks the trigger/stock identifiers.
    pub fn generation_plan(&mut self) -> GenerationPlan {
        let mut plan = GenerationPlan::default();
        for model_id in &self.models.models {
            for content_type in self.enabled_types() {
                plan.requests.push(GenerationRequest {
                    trigger_id: self.trigger_id.clone(),
                    stock_id: self.stock_id.clone(),
                    content_type,
                    model_id: model_id.clone(),
                    template: self.prompts.content(content_type).to_string(),
                    section_order: self.sections.order().to_vec(),
                    temperature: self.models.temperature,
                    max_tokens: self.models.max_tokens,
                });
            }
        }
        if !plan.is_empty() && !self.locked {
            self.locked = true;
            log::info!(
                "draft {}: identifiers locked (trigger={}, stock={})",
                self.id,
                self.trigger_id,
                self.stock_id
            );
        }
        plan
    }

    pub fn publish_state(&self) -> &PublishState {
        &self.publish
    }

    pub(crate) fn mark_validated(&mut self) {
        self.publish.status = PublishStatus::Validated;
        self.touch();
    }

    /// Applied only after validation passed; increments the version by
    /// exactly one and returns the new value.
    pub(crate) fn mark_published(&mut self) -> u32 {
        self.publish.status = PublishStatus::Published;
        self.publish.version += 1;
        self.touch();
        self.publish.version
    }

    pub fn summary(&self) -> DraftSummary {
        DraftSummary::from(self)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl From<&WorkflowDraft> for DraftSummary {
    fn from(draft: &WorkflowDraft) -> Self {
        Self {
            id: draft.id.clone(),
            trigger_id: draft.trigger_id.clone(),
            stock_id: draft.stock_id.clone(),
            data_mode: draft.data_mode,
            selected_section_count: draft.sections.selected_ids().len(),
            enabled_types: draft.enabled_types(),
            model_count: draft.models.models.len(),
            status: draft.publish.status,
            version: draft.publish.version,
            updated_at: draft.updated_at,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
