//! Price data model

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::UsageMap;
use crate::pricing::CostCalculator;

/// Per-model price definition as supplied by the price file
///
/// Prices are kept as decimal text until the catalog is built; numeric JSON
/// values are accepted and carried as their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPriceRecord {
    /// Cost per input text token
    #[serde(default, rename = "input_cost_per_token", deserialize_with = "price_text")]
    pub input_text: Option<String>,

    /// Cost per input image
    #[serde(default, rename = "input_cost_per_image", deserialize_with = "price_text")]
    pub input_image: Option<String>,

    /// Cost per second of input audio
    #[serde(default, rename = "input_cost_per_audio_per_second", deserialize_with = "price_text")]
    pub input_audio: Option<String>,

    /// Cost per second of input video
    #[serde(default, rename = "input_cost_per_video_per_second", deserialize_with = "price_text")]
    pub input_video: Option<String>,

    /// Cost per output text token
    #[serde(default, rename = "output_cost_per_token", deserialize_with = "price_text")]
    pub output_text: Option<String>,

    /// Cost per token written to the prompt cache
    #[serde(default, rename = "cache_creation_input_token_cost", deserialize_with = "price_text")]
    pub cache_write: Option<String>,

    /// Cost per token read from the prompt cache
    #[serde(default, rename = "cache_read_input_token_cost", deserialize_with = "price_text")]
    pub cache_read: Option<String>,

    /// Upstream provider identifier (e.g. "openai", "vertex_ai-language-models")
    #[serde(default, rename = "litellm_provider")]
    pub provider: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceText {
    Text(String),
    Number(serde_json::Number),
}

fn price_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PriceText>::deserialize(deserializer)?.map(|value| match value {
        PriceText::Text(text) => text,
        PriceText::Number(number) => number.to_string(),
    }))
}

/// Resolved unit prices for one model/provider pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelPrice {
    /// Cost per input text token
    pub input_text: Decimal,
    /// Cost per input image
    pub input_image: Decimal,
    /// Cost per second of input audio
    pub input_audio: Decimal,
    /// Cost per second of input video
    pub input_video: Decimal,
    /// Cost per output text token
    pub output_text: Decimal,
    /// Cost per cache-write token
    pub cache_write: Decimal,
    /// Cost per cache-read token
    pub cache_read: Decimal,
    /// Strategy bound at catalog build time
    pub calculator: CostCalculator,
}

impl Default for ModelPrice {
    /// The zero-cost entry used for unknown models
    fn default() -> Self {
        Self::ZERO
    }
}

impl ModelPrice {
    /// All prices zero, calculator always yields zero
    pub const ZERO: Self = Self {
        input_text: Decimal::ZERO,
        input_image: Decimal::ZERO,
        input_audio: Decimal::ZERO,
        input_video: Decimal::ZERO,
        output_text: Decimal::ZERO,
        cache_write: Decimal::ZERO,
        cache_read: Decimal::ZERO,
        calculator: CostCalculator::Zero,
    };

    /// Whether any prompt-cache price is configured
    pub fn has_cache_pricing(&self) -> bool {
        self.cache_write > Decimal::ZERO || self.cache_read > Decimal::ZERO
    }

    /// Cost of `usage` under the bound calculator
    pub fn cost(&self, usage: &UsageMap) -> Decimal {
        self.calculator.calculate(self, usage)
    }
}
