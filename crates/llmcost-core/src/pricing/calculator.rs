//! Cost calculation strategies
//!
//! Each model in the catalog is bound to exactly one strategy when the
//! catalog is built. Prompt-cache accounting differs between providers:
//! Anthropic reports cache tokens in their own bucket next to plain input
//! tokens, while OpenAI reports cached tokens as a subset of the prompt
//! tokens. Those two get dedicated strategies; everything else uses the
//! generic multimodal one.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ModelPrice, UsageDimension, UsageMap};

/// Strategy used to turn a price entry and a usage map into a cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCalculator {
    /// Always zero; bound to the default entry for unknown models
    Zero,
    /// Sum of independently gated text, media and cache components
    GenericMultimodal,
    /// Cache tokens billed as a bucket separate from plain input tokens
    AnthropicCache,
    /// Cached tokens billed as a discounted subset of input tokens
    OpenAiCache,
}

impl CostCalculator {
    /// Provider-specific cache calculator registered for an upstream provider
    pub fn cache_calculator_for(provider: &str) -> Option<Self> {
        match provider {
            "anthropic" => Some(Self::AnthropicCache),
            "openai" => Some(Self::OpenAiCache),
            _ => None,
        }
    }

    /// Pick the strategy for a model
    ///
    /// A provider-specific cache calculator only applies when the model has
    /// cache pricing at all.
    pub fn select(provider: &str, has_cache_pricing: bool) -> Self {
        if has_cache_pricing {
            Self::cache_calculator_for(provider).unwrap_or(Self::GenericMultimodal)
        } else {
            Self::GenericMultimodal
        }
    }

    /// Compute the cost of `usage` at `price`
    pub fn calculate(self, price: &ModelPrice, usage: &UsageMap) -> Decimal {
        match self {
            Self::Zero => Decimal::ZERO,
            Self::GenericMultimodal => generic_multimodal_cost(price, usage),
            Self::AnthropicCache => anthropic_cache_cost(price, usage),
            Self::OpenAiCache => openai_cache_cost(price, usage),
        }
    }
}

fn units(dimension: UsageDimension, usage: &UsageMap) -> Decimal {
    Decimal::from(dimension.count(usage))
}

fn text_cost(price: &ModelPrice, usage: &UsageMap) -> Decimal {
    price.input_text * units(UsageDimension::InputTokens, usage)
        + price.output_text * units(UsageDimension::OutputTokens, usage)
}

fn cache_cost(price: &ModelPrice, usage: &UsageMap) -> Decimal {
    price.cache_write * units(UsageDimension::CacheWriteTokens, usage)
        + price.cache_read * units(UsageDimension::CacheReadTokens, usage)
}

/// Image, audio and video cost; a modality counts only when it is both
/// priced and reported.
fn media_cost(price: &ModelPrice, usage: &UsageMap) -> Decimal {
    [
        (price.input_image, UsageDimension::ImageCount),
        (price.input_audio, UsageDimension::AudioSeconds),
        (price.input_video, UsageDimension::VideoSeconds),
    ]
    .into_iter()
    .filter_map(|(unit_price, dimension)| {
        let count = dimension.lookup(usage)?;
        (unit_price > Decimal::ZERO).then(|| unit_price * Decimal::from(count))
    })
    .sum()
}

fn generic_multimodal_cost(price: &ModelPrice, usage: &UsageMap) -> Decimal {
    let mut cost = Decimal::ZERO;

    if price.input_text > Decimal::ZERO || price.output_text > Decimal::ZERO {
        cost += text_cost(price, usage);
    }

    cost += media_cost(price, usage);

    if price.has_cache_pricing() {
        cost += cache_cost(price, usage);
    }

    cost
}

fn anthropic_cache_cost(price: &ModelPrice, usage: &UsageMap) -> Decimal {
    text_cost(price, usage) + cache_cost(price, usage) + media_cost(price, usage)
}

fn openai_cache_cost(price: &ModelPrice, usage: &UsageMap) -> Decimal {
    let cached = UsageDimension::CacheReadTokens.count(usage);
    let uncached = UsageDimension::InputTokens.count(usage).saturating_sub(cached);

    price.input_text * Decimal::from(uncached)
        + price.output_text * units(UsageDimension::OutputTokens, usage)
        + price.cache_read * Decimal::from(cached)
        + media_cost(price, usage)
}
