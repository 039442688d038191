//! Cost estimation from token totals.
//!
//! A static per-million-token price table keyed by model display name, with
//! separate rates for input, output, cache-read and cache-write tokens.
//! Opus-class models are priced above the Sonnet-class default; unknown
//! display names fall back to the default row. No currency conversion, and
//! no rounding until final display.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::model::ModelTokenTotals;

/// Per-million-token rates for one model class.
#[derive(Debug, Clone)]
pub struct ModelPricing {
    /// Cost per million input tokens.
    pub input_per_million: f64,
    /// Cost per million output tokens.
    pub output_per_million: f64,
    /// Cost per million cache-write tokens.
    pub cache_write_per_million: f64,
    /// Cost per million cache-read tokens.
    pub cache_read_per_million: f64,
}

static OPUS_PRICING: Lazy<ModelPricing> = Lazy::new(|| ModelPricing {
    input_per_million: 15.0,
    output_per_million: 75.0,
    cache_write_per_million: 18.75,
    cache_read_per_million: 1.5,
});

static SONNET_PRICING: Lazy<ModelPricing> = Lazy::new(|| ModelPricing {
    input_per_million: 3.0,
    output_per_million: 15.0,
    cache_write_per_million: 3.75,
    cache_read_per_million: 0.3,
});

static HAIKU_PRICING: Lazy<ModelPricing> = Lazy::new(|| ModelPricing {
    input_per_million: 1.0,
    output_per_million: 5.0,
    cache_write_per_million: 1.25,
    cache_read_per_million: 0.1,
});

/// Look up rates for a model display name.
///
/// Unknown names use the Sonnet-class default row.
#[must_use]
pub fn pricing_for(display_name: &str) -> &'static ModelPricing {
    let lower = display_name.to_ascii_lowercase();
    if lower.contains("opus") {
        &OPUS_PRICING
    } else if lower.contains("haiku") {
        &HAIKU_PRICING
    } else {
        &SONNET_PRICING
    }
}

/// Cost estimate for one model's token totals, in USD.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    /// Cost of fresh input tokens.
    pub input_cost: f64,
    /// Cost of output tokens.
    pub output_cost: f64,
    /// Cost of cache writes.
    pub cache_write_cost: f64,
    /// Cost of cache reads.
    pub cache_read_cost: f64,
    /// Sum of all categories.
    pub total_cost: f64,
}

impl CostEstimate {
    /// Total rounded to two decimals for display.
    #[must_use]
    pub fn total_display(&self) -> f64 {
        (self.total_cost * 100.0).round() / 100.0
    }
}

/// Estimate cost for one model's token totals.
#[must_use]
pub fn estimate_cost(display_name: &str, tokens: &ModelTokenTotals) -> CostEstimate {
    let pricing = pricing_for(display_name);

    let input_cost = (tokens.input_tokens as f64 / 1_000_000.0) * pricing.input_per_million;
    let output_cost = (tokens.output_tokens as f64 / 1_000_000.0) * pricing.output_per_million;
    let cache_write_cost =
        (tokens.cache_creation_input_tokens as f64 / 1_000_000.0) * pricing.cache_write_per_million;
    let cache_read_cost =
        (tokens.cache_read_input_tokens as f64 / 1_000_000.0) * pricing.cache_read_per_million;

    CostEstimate {
        input_cost,
        output_cost,
        cache_write_cost,
        cache_read_cost,
        total_cost: input_cost + output_cost + cache_write_cost + cache_read_cost,
    }
}
