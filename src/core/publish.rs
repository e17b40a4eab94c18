//! Publish Gate
//!
//! Pre-publish validation and the atomic publish step. Validation is a
//! pure read of the draft plus recorded generation results, producing a
//! report grouped into shared issues and per-content-type issues. Publish
//! re-runs validation and only then flips the status and bumps the
//! version, so a failed publish leaves the draft untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::workflow::{ContentType, WorkflowDraft};

// ============================================================================
// Validation Report
// ============================================================================

/// Where an issue applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "contentType")]
pub enum IssueScope {
    /// Applies to the whole draft.
    Shared,
    /// Applies to one content type's prompt or results.
    ContentType(ContentType),
}

/// Machine-readable issue identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    NoModelSelected,
    EmptyPrompt,
    InvalidPlaceholders,
    NoCompletedGeneration,
}

/// One blocking problem found by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub scope: IssueScope,
    pub code: IssueCode,
    pub message: String,
}

/// All issues found for a draft. Empty means publishable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues applying to the whole draft.
    pub fn shared_issues(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.scope == IssueScope::Shared)
            .collect()
    }

    /// Issues scoped to one content type.
    pub fn issues_for(&self, content_type: ContentType) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.scope == IssueScope::ContentType(content_type))
            .collect()
    }

    fn push(&mut self, scope: IssueScope, code: IssueCode, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            scope,
            code,
            message: message.into(),
        });
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    #[error("draft failed validation with {} issue(s)", .0.issues.len())]
    ValidationFailed(ValidationReport),
}

// ============================================================================
// Publish Gate
// ============================================================================

/// Validates a draft against the publish checklist and performs the
/// atomic publish.
pub struct PublishGate;

impl PublishGate {
    /// Run the full checklist without mutating anything.
    ///
    /// `completed_types` is the set of content types that have at least
    /// one completed generation result, as reported by the comparator.
    pub fn validate(
        draft: &WorkflowDraft,
        completed_types: &HashSet<ContentType>,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        if draft.models().is_empty() {
            report.push(
                IssueScope::Shared,
                IssueCode::NoModelSelected,
                "select at least one model before publishing",
            );
        }

        for content_type in draft.enabled_types() {
            let scope = IssueScope::ContentType(content_type);

            if draft.prompt(content_type).trim().is_empty() {
                report.push(
                    scope,
                    IssueCode::EmptyPrompt,
                    format!("the {content_type} prompt is empty"),
                );
            } else {
                let placeholder_report = draft.validate_prompt(content_type);
                if !placeholder_report.is_clean() {
                    let invalid = placeholder_report.invalid_tokens().len()
                        + placeholder_report.warnings.len();
                    report.push(
                        scope,
                        IssueCode::InvalidPlaceholders,
                        format!("the {content_type} prompt has {invalid} placeholder problem(s)"),
                    );
                }
            }

            if !completed_types.contains(&content_type) {
                report.push(
                    scope,
                    IssueCode::NoCompletedGeneration,
                    format!("no completed generation result for the {content_type} type"),
                );
            }
        }

        report
    }

    /// Validate and, only if the checklist passes, mark the draft
    /// published and bump its version by one. Returns the new version.
    /// On failure the draft is left exactly as it was.
    pub fn publish(
        draft: &mut WorkflowDraft,
        completed_types: &HashSet<ContentType>,
    ) -> Result<u32, PublishError> {
        let report = Self::validate(draft, completed_types);
        if !report.is_valid() {
            log::warn!(
                "publish blocked for draft {}: {} issue(s)",
                draft.id,
                report.issues.len()
            );
            return Err(PublishError::ValidationFailed(report));
        }

        draft.mark_validated();
        let version = draft.mark_published();
        log::info!("draft {} published as version {version}", draft.id);
        Ok(version)
    }
}

// ============================================================================
// Tests
// ============================================================================
