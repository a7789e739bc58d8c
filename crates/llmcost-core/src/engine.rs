//! Cost engine
//!
//! Estimates the USD cost of a single LLM call from the price catalog, falling
//! back to a cost reported in the caller's metadata when the catalog has
//! nothing useful to say.

use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::Result;
use crate::models::{ModelPrice, Span, UsageMap};
use crate::pricing::provider::model_provider_key;
use crate::pricing::{load_price_file, PriceCatalog};

const METADATA_COST: &str = "cost";
const METADATA_CURRENCY: &str = "currency";
const METADATA_TOTAL: &str = "total_tokens";
const SUPPORTED_CURRENCY: &str = "USD";

/// Cost engine over a shared, immutable price catalog
#[derive(Debug, Clone)]
pub struct CostEngine {
    catalog: Arc<PriceCatalog>,
}

impl CostEngine {
    /// Create an engine over an already built catalog
    pub fn new(catalog: PriceCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Load the price file and build the catalog
    pub fn from_price_file(path: impl AsRef<Path>) -> Result<Self> {
        let definitions = load_price_file(path)?;
        Ok(Self::new(PriceCatalog::build(definitions)?))
    }

    /// The underlying price catalog
    pub fn catalog(&self) -> &PriceCatalog {
        &self.catalog
    }

    /// Price entry used for a model/provider pair
    ///
    /// The provider is matched as supplied against the catalog's canonical
    /// provider names. Anything missing resolves to the zero-cost entry.
    pub fn model_price(&self, model_name: Option<&str>, provider: Option<&str>) -> &ModelPrice {
        let (Some(model_name), Some(provider)) = (model_name, provider) else {
            return &ModelPrice::ZERO;
        };

        let key = model_provider_key(model_name, provider);
        match self.catalog.get(&key) {
            Some(price) => price,
            None => {
                debug!(key = %key, "Unknown model for cost calculation");
                &ModelPrice::ZERO
            }
        }
    }

    /// Estimate the cost of one LLM call
    ///
    /// Never fails: unknown models and missing inputs cost zero unless the
    /// metadata carries a USD cost.
    pub fn calculate_cost(
        &self,
        model_name: Option<&str>,
        provider: Option<&str>,
        usage: Option<&UsageMap>,
        metadata: Option<&Value>,
    ) -> Decimal {
        let price = self.model_price(model_name, provider);
        let estimated = match usage {
            Some(usage) => price.cost(usage),
            None => price.cost(&UsageMap::new()),
        };

        if estimated > Decimal::ZERO {
            estimated
        } else {
            cost_from_metadata(metadata)
        }
    }

    /// Fill in the estimated cost of a span
    pub fn annotate(&self, span: &mut Span) {
        let cost = self.calculate_cost(
            span.model_name.as_deref(),
            span.provider.as_deref(),
            span.usage.as_ref(),
            span.metadata.as_ref(),
        );
        trace!(span_id = %span.span_id, cost = %cost, "Annotated span cost");
        span.total_estimated_cost = Some(cost);
    }

    /// Annotate every span, returning how many received a positive cost
    pub fn annotate_batch(&self, spans: &mut [Span]) -> usize {
        let mut costed = 0;
        for span in spans.iter_mut() {
            self.annotate(span);
            if span.total_estimated_cost.is_some_and(|cost| cost > Decimal::ZERO) {
                costed += 1;
            }
        }
        debug!(spans = spans.len(), costed, "Annotated span batch");
        costed
    }
}

/// Cost reported by the caller in `metadata.cost`
///
/// Only a `USD` currency is honored; the amount is read from
/// `cost.total_tokens`. Anything else yields zero.
pub fn cost_from_metadata(metadata: Option<&Value>) -> Decimal {
    let Some(cost) = metadata.and_then(|metadata| metadata.get(METADATA_COST)) else {
        return Decimal::ZERO;
    };

    let is_usd = cost
        .get(METADATA_CURRENCY)
        .and_then(Value::as_str)
        .is_some_and(|currency| currency == SUPPORTED_CURRENCY);
    if !is_usd {
        return Decimal::ZERO;
    }

    cost.get(METADATA_TOTAL)
        .and_then(json_decimal)
        .unwrap_or(Decimal::ZERO)
}

fn json_decimal(value: &Value) -> Option<Decimal> {
    let Value::Number(number) = value else {
        return None;
    };
    let text = number.to_string();
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
