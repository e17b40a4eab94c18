//! Placeholder Validation
//!
//! Pure scan of a template for `{{section_id}}` tokens. Each token is
//! classified against the section board: valid (selected), unknown
//! (no such catalog id), or not selected. Malformed delimiters are
//! reported as warnings, never as errors — the editor must remain usable
//! with invalid input.
//!
//! Scanning never mutates the template and is idempotent: the same input
//! and section state always yield the same report.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::workflow::sections::SectionBoard;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("valid placeholder regex"));

// ============================================================================
// Report Types
// ============================================================================

/// Classification of a single placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    /// References a selected section.
    Valid,
    /// No catalog section has this id.
    UnknownSection,
    /// The section exists but is not selected.
    NotSelected,
}

/// A placeholder token found in the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderToken {
    /// The referenced section id.
    pub name: String,
    /// Character offset of the opening `{{` (for UI highlighting).
    pub offset: usize,
    /// Length of the whole token in characters, delimiters included.
    pub len: usize,
    pub status: TokenStatus,
}

/// A malformed-syntax warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderWarning {
    /// Character offset of the offending `{{`.
    pub offset: usize,
    pub message: String,
}

/// Result of scanning one template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderReport {
    pub tokens: Vec<PlaceholderToken>,
    pub warnings: Vec<PlaceholderWarning>,
}

impl PlaceholderReport {
    /// Tokens referencing nonexistent or unselected sections.
    pub fn invalid_tokens(&self) -> Vec<&PlaceholderToken> {
        self.tokens
            .iter()
            .filter(|t| t.status != TokenStatus::Valid)
            .collect()
    }

    /// No invalid tokens and no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.invalid_tokens().is_empty()
    }
}

// ============================================================================
// Scanner
// ============================================================================

/// Scan a template for placeholder tokens and classify each against the
/// section board.
pub fn scan(template: &str, board: &SectionBoard) -> PlaceholderReport {
    let mut report = PlaceholderReport::default();
    let mut matched_starts: Vec<usize> = Vec::new();

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let whole = caps.get(0).expect("match 0 always present");
        let name = caps.get(1).expect("capture group 1 always present").as_str();

        let status = if !board.is_known(name) {
            TokenStatus::UnknownSection
        } else if !board.is_selected(name) {
            TokenStatus::NotSelected
        } else {
            TokenStatus::Valid
        };

        matched_starts.push(whole.start());
        report.tokens.push(PlaceholderToken {
            name: name.to_string(),
            offset: char_offset(template, whole.start()),
            len: whole.as_str().chars().count(),
            status,
        });
    }

    // Any `{{` that did not open a well-formed token is malformed:
    // unterminated, empty, or containing characters outside the id set.
    for (byte_off, _) in template.match_indices("{{") {
        if !matched_starts.contains(&byte_off) && !inside_match(template, byte_off) {
            report.warnings.push(PlaceholderWarning {
                offset: char_offset(template, byte_off),
                message: "malformed placeholder: expected `{{section_id}}`".to_string(),
            });
        }
    }

    report
}

/// Whether a byte offset falls inside any well-formed token.
fn inside_match(template: &str, byte_off: usize) -> bool {
    PLACEHOLDER_RE
        .find_iter(template)
        .any(|m| m.start() < byte_off && byte_off < m.end())
}

fn char_offset(template: &str, byte_off: usize) -> usize {
    template[..byte_off].chars().count()
}

// ============================================================================
// Tests
// ============================================================================
