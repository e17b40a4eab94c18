//! Test Fixtures
//!
//! Shared builders for section catalogs and workflow drafts, plus a
//! scriptable in-memory generation provider.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::generation::{
    GenerationOutput, GenerationProvider, GenerationRequest, ProviderError, TokenUsage,
};
use crate::core::workflow::{ContentType, SectionInfo, SectionSource, WorkflowDraft};

// =============================================================================
// Catalog and Draft Fixtures
// =============================================================================

/// A mixed-source catalog: one existing-data block plus three fresh sections.
pub fn test_catalog() -> Vec<SectionInfo> {
    vec![
        SectionInfo::new("existing_article", "Existing Article Data", SectionSource::Old),
        SectionInfo::new("company_info", "Company Info", SectionSource::New),
        SectionInfo::new("cash_flow", "Cash Flow", SectionSource::New),
        SectionInfo::new("valuation", "Valuation", SectionSource::New),
    ]
}

/// A fresh draft with the test catalog loaded and nothing else configured.
pub fn empty_draft() -> WorkflowDraft {
    let mut draft = WorkflowDraft::new("trig-1", "AAPL");
    draft.set_catalog(test_catalog());
    draft
}

/// A draft that passes the publish checklist once a paid result exists:
/// one selected section, a clean paid prompt, and one model.
pub fn ready_draft() -> WorkflowDraft {
    let mut draft = empty_draft();
    draft.select_section("cash_flow");
    draft.set_prompt(ContentType::Paid, "Summarize {{cash_flow}} for subscribers.");
    draft.add_model("openai/gpt-4o");
    draft
}

// =============================================================================
// Mock Provider
// =============================================================================

/// In-memory provider with a call counter, optional per-type failures,
/// and an optional artificial delay.
#[derive(Default)]
pub struct MockProvider {
    calls: AtomicUsize,
    fail_types: HashSet<ContentType>,
    delay: Option<Duration>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request for the given content types.
    pub fn failing_for(types: &[ContentType]) -> Self {
        Self {
            fail_types: types.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total requests received, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_types.contains(&request.content_type) {
            return Err(ProviderError::Upstream(format!(
                "simulated failure for {}",
                request.content_type
            )));
        }

        Ok(GenerationOutput {
            text: format!("[{}] {}", request.model_id, request.template),
            usage: TokenUsage::new(120, 80),
            cost_usd: 0.002,
            latency_ms: 5,
            model_name: request.model_id.clone(),
            provider: "mock".to_string(),
        })
    }
}
