//! Generation Provider Interface
//!
//! The comparator treats text generation as an opaque async operation
//! behind [`GenerationProvider`]. Production wires this to the
//! configuration API ([`crate::core::client::RemoteProvider`]); tests use
//! in-memory mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::GenerationOutput;
use crate::core::workflow::types::ContentType;

/// Inputs for one generation attempt of one (model, content type) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub trigger_id: String,
    pub stock_id: String,
    pub content_type: ContentType,
    pub model_id: String,
    /// The prompt template for this content type.
    pub template: String,
    /// Section ids in output order, resolved to structured data upstream.
    pub section_order: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Errors surfaced by a provider. Always local to the one request that
/// produced them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("provider rejected the request: {0}")]
    Upstream(String),
}

/// An opaque async text-generation backend.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Stable provider identifier (e.g., "remote", "mock").
    fn id(&self) -> &str;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Run one generation request to completion.
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationOutput, ProviderError>;
}
