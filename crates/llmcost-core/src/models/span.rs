//! Span data model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::UsageMap;

/// A span represents a single LLM call whose cost is to be estimated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Span ID
    #[serde(default)]
    pub span_id: String,

    /// Trace ID this span belongs to
    #[serde(default)]
    pub trace_id: String,

    /// Model name (e.g., "gpt-4o", "vertex_ai/gemini-1.5-pro")
    #[serde(default)]
    pub model_name: Option<String>,

    /// Model provider (e.g., "openai", "google_vertexai")
    #[serde(default)]
    pub provider: Option<String>,

    /// Reported usage counters
    #[serde(default)]
    pub usage: Option<UsageMap>,

    /// Caller-supplied metadata
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    /// Estimated cost in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_estimated_cost: Option<Decimal>,
}
