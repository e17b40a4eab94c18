//! Token and Cost Metadata
//!
//! Token accounting for generation results and a static pricing table for
//! estimating cost before a request is made.

use serde::{Deserialize, Serialize};

// ============================================================================
// Token Usage
// ============================================================================

/// Token usage for a request/response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input/prompt tokens
    pub input_tokens: u32,
    /// Number of output/completion tokens
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Add another usage to this one
    pub fn add(&mut self, other: &TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

// ============================================================================
// Model Pricing
// ============================================================================

/// Pricing information for a provider/model combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Provider identifier (e.g., "openai", "anthropic")
    pub provider_id: String,
    /// Model identifier (e.g., "gpt-4o", "claude-3-5-sonnet")
    pub model_id: String,
    /// Cost per 1 million input tokens in USD
    pub input_cost_per_million: f64,
    /// Cost per 1 million output tokens in USD
    pub output_cost_per_million: f64,
}

impl ModelPricing {
    /// Calculate cost for given token usage
    pub fn calculate_cost(&self, usage: &TokenUsage) -> f64 {
        let input_cost = (usage.input_tokens as f64 / 1_000_000.0) * self.input_cost_per_million;
        let output_cost = (usage.output_tokens as f64 / 1_000_000.0) * self.output_cost_per_million;
        input_cost + output_cost
    }

    /// Estimate cost for a request (before execution)
    pub fn estimate_cost(&self, estimated_input: u32, estimated_output: u32) -> f64 {
        self.calculate_cost(&TokenUsage::new(estimated_input, estimated_output))
    }

    /// Get known pricing for the supported providers (as of early 2025).
    pub fn for_model(provider: &str, model: &str) -> Option<Self> {
        let (input, output) = match (provider, model) {
            ("anthropic", m) if m.contains("opus") => (15.0, 75.0),
            ("anthropic", m) if m.contains("sonnet") => (3.0, 15.0),
            ("anthropic", m) if m.contains("haiku") => (0.80, 4.0),

            ("openai", m) if m.contains("gpt-4o-mini") => (0.15, 0.60),
            ("openai", m) if m.contains("gpt-4o") => (2.50, 10.0),
            ("openai", m) if m.contains("gpt-4-turbo") => (10.0, 30.0),
            ("openai", m) if m.contains("gpt-3.5-turbo") => (0.50, 1.50),

            ("gemini", m) | ("google", m) if m.contains("2.0-flash") => (0.10, 0.40),
            ("gemini", m) | ("google", m) if m.contains("1.5-pro") => (1.25, 5.0),
            ("gemini", m) | ("google", m) if m.contains("1.5-flash") => (0.075, 0.30),

            _ => return None,
        };

        Some(Self {
            provider_id: provider.to_string(),
            model_id: model.to_string(),
            input_cost_per_million: input,
            output_cost_per_million: output,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
