//! Configuration API Client
//!
//! Thin typed wrapper over the backend HTTP API: trigger listing and
//! data fetch, structured-data generation, news generation, and config
//! save/publish. All request/response bodies cross the wire as
//! camelCase JSON.
//!
//! [`RemoteProvider`] adapts the client to the
//! [`GenerationProvider`] trait so the comparator can drive it like any
//! other backend: it fetches structured data for the request's section
//! order, then runs the news generation with it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::core::generation::{
    GenerationOutput, GenerationProvider, GenerationRequest, ModelPricing, ProviderError,
    TokenUsage,
};
use crate::core::workflow::{ContentType, DataMode, SectionInfo, SectionSource};

// ============================================================================
// Wire Types
// ============================================================================

/// A trigger event eligible for news generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerInfo {
    pub id: String,
    pub name: String,
    pub status: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

/// One structured-data section as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionContent {
    pub title: String,
    pub content: String,
}

/// Structured data for a stock, keyed by section id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredData {
    pub sections: HashMap<String, SectionContent>,
    /// Backend's default section ordering.
    pub section_order: Vec<String>,
}

impl StructuredData {
    /// Flatten into a section catalog for the workflow. Every backend
    /// section arrives from the NEW pipeline; OLD-mode visibility adds a
    /// single fixed block for the existing article data.
    pub fn to_catalog(&self, mode: DataMode) -> Vec<SectionInfo> {
        let mut catalog = Vec::new();
        if mode != DataMode::New {
            catalog.push(SectionInfo::new(
                "existing_article",
                "Existing Article Data",
                SectionSource::Old,
            ));
        }
        for id in &self.section_order {
            if let Some(section) = self.sections.get(id) {
                catalog.push(SectionInfo::new(id, &section.title, SectionSource::New));
            }
        }
        catalog
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredDataRequest {
    stock_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sections: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_order: Option<Vec<String>>,
}

/// Request body for one news generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsGenerateRequest {
    pub trigger_name: String,
    pub stock_id: String,
    pub prompt_type: ContentType,
    pub model_id: String,
    pub structured_data: StructuredData,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Response body for one news generation call. Cost and latency are
/// the server's authoritative figures; they are optional so older
/// backends that omit them still decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsGenerateResponse {
    pub generated_text: String,
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub latency_seconds: Option<f64>,
    pub model_name: String,
    pub provider: String,
    #[serde(default)]
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

/// Response body after saving or publishing a configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatusResponse {
    pub status: String,
    pub version: u32,
    pub is_active: bool,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Api Client
// ============================================================================

/// Typed HTTP client for the configuration backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> ApiResult<Self> {
        Self::new(
            config.generation.api_base_url.clone(),
            Duration::from_secs(config.generation.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Triggers eligible for news generation.
    pub async fn list_triggers(&self) -> ApiResult<Vec<TriggerInfo>> {
        self.get("/api/triggers", &[]).await
    }

    /// Existing ("OLD" pipeline) data for a trigger/stock pair. The body
    /// shape is backend-defined, so it is surfaced as raw JSON.
    pub async fn trigger_data(
        &self,
        trigger_id: &str,
        stock_id: &str,
    ) -> ApiResult<serde_json::Value> {
        self.get(
            &format!("/api/triggers/{trigger_id}/data"),
            &[("stockId", stock_id)],
        )
        .await
    }

    /// Generate (or fetch cached) structured data for a stock. Both the
    /// section filter and the ordering are optional; the backend falls
    /// back to its defaults when they are omitted.
    pub async fn generate_structured(
        &self,
        stock_id: &str,
        sections: Option<Vec<String>>,
        section_order: Option<Vec<String>>,
    ) -> ApiResult<StructuredData> {
        let body = StructuredDataRequest {
            stock_id: stock_id.to_string(),
            sections,
            section_order,
        };
        self.post("/api/data/structured/generate", &body).await
    }

    /// Run one news generation.
    pub async fn generate_news(
        &self,
        request: &NewsGenerateRequest,
    ) -> ApiResult<NewsGenerateResponse> {
        self.post("/api/news/generate", request).await
    }

    /// Persist a draft configuration without activating it.
    pub async fn save_config(
        &self,
        payload: &serde_json::Value,
    ) -> ApiResult<ConfigStatusResponse> {
        self.post("/api/config/save", payload).await
    }

    /// Publish a configuration, flipping the active flag and returning
    /// the new version.
    pub async fn publish_config(
        &self,
        payload: &serde_json::Value,
    ) -> ApiResult<ConfigStatusResponse> {
        self.post("/api/config/publish", payload).await
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                code: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// ============================================================================
// Remote Provider
// ============================================================================

/// [`GenerationProvider`] backed by the configuration API. Fetches
/// structured data for the request's section order, then posts the news
/// generation with it.
pub struct RemoteProvider {
    client: ApiClient,
}

impl RemoteProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Split a model id of the form "provider/model" for pricing lookup.
    fn pricing_for(model_id: &str) -> Option<ModelPricing> {
        let (provider, model) = model_id.split_once('/')?;
        ModelPricing::for_model(provider, model)
    }

    fn map_error(e: ApiError) -> ProviderError {
        match e {
            ApiError::Status { code, message } => {
                ProviderError::Upstream(format!("{code}: {message}"))
            }
            other => ProviderError::Request(other.to_string()),
        }
    }
}

#[async_trait]
impl GenerationProvider for RemoteProvider {
    fn id(&self) -> &str {
        "remote"
    }

    fn name(&self) -> &str {
        "Configuration API"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, ProviderError> {
        let started = Instant::now();

        let structured = self
            .client
            .generate_structured(
                &request.stock_id,
                Some(request.section_order.clone()),
                Some(request.section_order.clone()),
            )
            .await
            .map_err(Self::map_error)?;

        let body = NewsGenerateRequest {
            trigger_name: request.trigger_id.clone(),
            stock_id: request.stock_id.clone(),
            prompt_type: request.content_type,
            model_id: request.model_id.clone(),
            structured_data: structured,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .generate_news(&body)
            .await
            .map_err(Self::map_error)?;

        let usage = TokenUsage::new(response.input_tokens, response.output_tokens);
        // Server figures are authoritative; fall back to the local
        // pricing table and wall clock only when the backend omits them.
        let cost_usd = response.cost.unwrap_or_else(|| {
            Self::pricing_for(&request.model_id)
                .map(|p| p.calculate_cost(&usage))
                .unwrap_or(0.0)
        });
        let latency_ms = response
            .latency_seconds
            .map(|s| (s * 1000.0) as u64)
            .unwrap_or_else(|| started.elapsed().as_millis() as u64);

        Ok(GenerationOutput {
            text: response.generated_text,
            usage,
            cost_usd,
            latency_ms,
            model_name: response.model_name,
            provider: response.provider,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
