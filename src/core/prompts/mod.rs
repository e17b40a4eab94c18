//! Prompt Drafting
//!
//! One free-text template per content type, with a bounded undo/redo
//! history and live character/word counts. Placeholder validation lives in
//! [`placeholders`].

pub mod placeholders;

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::workflow::types::ContentType;

pub use placeholders::{PlaceholderReport, PlaceholderToken, PlaceholderWarning, TokenStatus};

/// Default undo stack depth per draft.
pub const DEFAULT_UNDO_DEPTH: usize = 10;

// ============================================================================
// Prompt Draft
// ============================================================================

/// An editable template for one content type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptDraft {
    content: String,
    char_count: usize,
    word_count: usize,
    /// Previous contents, oldest first. Capped; oldest dropped on overflow.
    undo: VecDeque<String>,
    /// Undone contents, most recent last.
    redo: Vec<String>,
    /// Last edit timestamp; `None` until first edited.
    updated_at: Option<DateTime<Utc>>,
}

impl PromptDraft {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Replace the content, pushing the previous value onto the undo stack.
    /// Setting identical content is a no-op.
    fn set_content(&mut self, text: &str, undo_depth: usize) {
        if self.content == text {
            return;
        }
        if self.undo.len() >= undo_depth.max(1) {
            self.undo.pop_front();
        }
        self.undo.push_back(std::mem::take(&mut self.content));
        self.redo.clear();
        self.apply(text.to_string());
    }

    /// Restore the most recent undo entry. Returns false when the stack
    /// is empty (no-op, not an error).
    fn undo(&mut self) -> bool {
        match self.undo.pop_back() {
            Some(previous) => {
                self.redo.push(std::mem::take(&mut self.content));
                self.apply(previous);
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone entry. Returns false when the
    /// stack is empty.
    fn redo(&mut self) -> bool {
        match self.redo.pop() {
            Some(next) => {
                self.undo.push_back(std::mem::take(&mut self.content));
                self.apply(next);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, content: String) {
        self.char_count = content.chars().count();
        self.word_count = content.split_whitespace().count();
        self.content = content;
        self.updated_at = Some(Utc::now());
    }
}

// ============================================================================
// Prompt Workspace
// ============================================================================

/// Per-content-type prompt drafts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptWorkspace {
    drafts: HashMap<ContentType, PromptDraft>,
    undo_depth: usize,
}

impl Default for PromptWorkspace {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}

impl PromptWorkspace {
    pub fn new(undo_depth: usize) -> Self {
        Self {
            drafts: HashMap::new(),
            undo_depth,
        }
    }

    /// The draft for a content type, if it has ever been edited.
    pub fn draft(&self, content_type: ContentType) -> Option<&PromptDraft> {
        self.drafts.get(&content_type)
    }

    /// Current template text for a content type ("" if never edited).
    pub fn content(&self, content_type: ContentType) -> &str {
        self.drafts
            .get(&content_type)
            .map(|d| d.content())
            .unwrap_or("")
    }

    /// Replace the template for a content type.
    pub fn set_content(&mut self, content_type: ContentType, text: &str) {
        let depth = self.undo_depth;
        self.drafts
            .entry(content_type)
            .or_default()
            .set_content(text, depth);
    }

    /// Undo the last edit for a content type. No-op on empty history.
    pub fn undo(&mut self, content_type: ContentType) -> bool {
        self.drafts
            .get_mut(&content_type)
            .map(|d| d.undo())
            .unwrap_or(false)
    }

    /// Redo the last undone edit for a content type. No-op on empty history.
    pub fn redo(&mut self, content_type: ContentType) -> bool {
        self.drafts
            .get_mut(&content_type)
            .map(|d| d.redo())
            .unwrap_or(false)
    }
}

// ============================================================================
// Tests
// ============================================================================
