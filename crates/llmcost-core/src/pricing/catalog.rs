//! Price catalog
//!
//! The catalog is built once from the raw price definitions and is read-only
//! afterwards. Keys are `"<model>/<provider>"` with the vendor prefix removed
//! from the model and the provider translated to its canonical name.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, error, info, trace};

use crate::error::{Error, Result};
use crate::models::{ModelPrice, RawPriceRecord};

use super::calculator::CostCalculator;
use super::provider::{canonical_provider, model_provider_key};

/// Immutable lookup table from model/provider key to price entry
#[derive(Debug, Clone)]
pub struct PriceCatalog {
    prices: HashMap<String, ModelPrice>,
}

impl PriceCatalog {
    /// Build the catalog from raw price definitions
    ///
    /// Records whose provider has no canonical name are dropped. Later
    /// records overwrite earlier ones that normalize to the same key.
    pub fn build<I>(raw_records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, RawPriceRecord)>,
    {
        let mut prices = HashMap::new();
        let mut seen = 0usize;
        let mut dropped = 0usize;

        for (model_name, record) in raw_records {
            seen += 1;

            let raw_provider = record.provider.as_deref().unwrap_or_default();
            let Some(provider) = canonical_provider(raw_provider) else {
                trace!(model = %model_name, provider = raw_provider, "Skipping unpriced provider");
                dropped += 1;
                continue;
            };

            let price = parse_model_price(&model_name, raw_provider, &record).inspect_err(|e| {
                error!(model = %model_name, error = %e, "Invalid price definition");
            })?;

            let key = model_provider_key(&model_name, provider);
            debug!(key = %key, calculator = ?price.calculator, "Registered model price");
            prices.insert(key, price);
        }

        if seen == 0 {
            error!("No model price definitions supplied");
            return Err(Error::catalog_load("price definitions are empty"));
        }
        if prices.is_empty() {
            error!(dropped, "No price definition matched a supported provider");
            return Err(Error::catalog_load("no price definitions for supported providers"));
        }

        info!(
            entries = prices.len(),
            records = seen,
            dropped,
            "Price catalog built"
        );

        Ok(Self { prices })
    }

    /// Look up an entry by its composite key
    pub fn get(&self, key: &str) -> Option<&ModelPrice> {
        self.prices.get(key)
    }

    /// Look up an entry by model name and canonical provider
    pub fn find(&self, model_name: &str, provider: &str) -> Option<&ModelPrice> {
        self.get(&model_provider_key(model_name, provider))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Iterate over all entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelPrice)> {
        self.prices.iter().map(|(key, price)| (key.as_str(), price))
    }
}

fn parse_model_price(model_name: &str, provider: &str, record: &RawPriceRecord) -> Result<ModelPrice> {
    let field = |name: &'static str, value: &Option<String>| parse_price(model_name, name, value.as_deref());

    let mut price = ModelPrice {
        input_text: field("input_cost_per_token", &record.input_text)?,
        input_image: field("input_cost_per_image", &record.input_image)?,
        input_audio: field("input_cost_per_audio_per_second", &record.input_audio)?,
        input_video: field("input_cost_per_video_per_second", &record.input_video)?,
        output_text: field("output_cost_per_token", &record.output_text)?,
        cache_write: field("cache_creation_input_token_cost", &record.cache_write)?,
        cache_read: field("cache_read_input_token_cost", &record.cache_read)?,
        calculator: CostCalculator::GenericMultimodal,
    };
    price.calculator = CostCalculator::select(provider, price.has_cache_pricing());

    Ok(price)
}

/// Parse a non-negative decimal price; absent means zero
fn parse_price(model_name: &str, field: &'static str, value: Option<&str>) -> Result<Decimal> {
    let Some(text) = value else {
        return Ok(Decimal::ZERO);
    };

    let trimmed = text.trim();
    let price = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::invalid_price(model_name, field, text))?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(Error::invalid_price(model_name, field, text));
    }

    Ok(price.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn record(provider: &str) -> RawPriceRecord {
        RawPriceRecord {
            provider: Some(provider.to_string()),
            ..RawPriceRecord::default()
        }
    }

    fn priced(provider: &str, input: &str, output: &str) -> RawPriceRecord {
        RawPriceRecord {
            input_text: Some(input.to_string()),
            output_text: Some(output.to_string()),
            ..record(provider)
        }
    }

    #[test]
    fn test_build_normalizes_keys() {
        let catalog = PriceCatalog::build([
            ("gpt-4".to_string(), priced("openai", "0.01", "0.03")),
            ("gemini/gemini-pro".to_string(), priced("gemini", "0.0000005", "0.0000015")),
            (
                "vertex_ai/gemini-1.5-pro".to_string(),
                priced("vertex_ai-language-models", "0.00000125", "0.000005"),
            ),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(catalog.get("gpt-4/openai").is_some());
        assert!(catalog.get("gemini-pro/google_ai").is_some());
        assert!(catalog.find("gemini-1.5-pro", "google_vertexai").is_some());
        assert!(catalog.get("gemini/gemini-pro/gemini").is_none());
    }

    #[test]
    fn test_build_parses_prices() {
        let catalog = PriceCatalog::build([("gpt-4".to_string(), priced("openai", "0.01", "3e-2"))]).unwrap();
        let price = catalog.get("gpt-4/openai").unwrap();

        assert_eq!(price.input_text, dec!(0.01));
        assert_eq!(price.output_text, dec!(0.03));
        assert_eq!(price.input_image, Decimal::ZERO);
        assert_eq!(price.cache_read, Decimal::ZERO);
        assert_eq!(price.calculator, CostCalculator::GenericMultimodal);
    }

    #[test]
    fn test_build_drops_unmapped_providers() {
        let catalog = PriceCatalog::build([
            ("gpt-4".to_string(), priced("openai", "0.01", "0.03")),
            ("titan".to_string(), priced("bedrock", "0.01", "0.03")),
            ("mystery".to_string(), RawPriceRecord::default()),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.iter().all(|(key, _)| key == "gpt-4/openai"));
    }

    #[test]
    fn test_unmapped_provider_prices_are_not_validated() {
        let catalog = PriceCatalog::build([
            ("gpt-4".to_string(), priced("openai", "0.01", "0.03")),
            ("sample_spec".to_string(), priced("see docs", "n/a", "n/a")),
        ]);
        assert!(catalog.is_ok());
    }

    #[test]
    fn test_build_binds_cache_calculators() {
        let cached = |provider: &str| RawPriceRecord {
            cache_read: Some("0.001".to_string()),
            ..priced(provider, "0.003", "0.015")
        };
        let catalog = PriceCatalog::build([
            ("claude-3".to_string(), cached("anthropic")),
            ("gpt-4o".to_string(), cached("openai")),
            ("gemini-1.5-pro".to_string(), cached("gemini")),
            ("vertex_ai/claude-3".to_string(), cached("vertex_ai-anthropic_models")),
            ("claude-2".to_string(), priced("anthropic", "0.008", "0.024")),
        ])
        .unwrap();

        let calculator = |key: &str| catalog.get(key).unwrap().calculator;
        assert_eq!(calculator("claude-3/anthropic"), CostCalculator::AnthropicCache);
        assert_eq!(calculator("gpt-4o/openai"), CostCalculator::OpenAiCache);
        assert_eq!(calculator("gemini-1.5-pro/google_ai"), CostCalculator::GenericMultimodal);
        assert_eq!(calculator("claude-3/anthropic_vertexai"), CostCalculator::GenericMultimodal);
        assert_eq!(calculator("claude-2/anthropic"), CostCalculator::GenericMultimodal);
    }

    #[test]
    fn test_last_write_wins() {
        let mut raw = IndexMap::new();
        raw.insert("gpt-4".to_string(), priced("openai", "0.01", "0.03"));
        raw.insert("azure/gpt-4".to_string(), priced("openai", "0.02", "0.06"));

        let catalog = PriceCatalog::build(raw).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("gpt-4/openai").unwrap().input_text, dec!(0.02));
    }

    #[test]
    fn test_empty_definitions_are_fatal() {
        let err = PriceCatalog::build(Vec::<(String, RawPriceRecord)>::new()).unwrap_err();
        assert!(matches!(err, Error::CatalogLoad(_)));
    }

    #[test]
    fn test_no_supported_provider_is_fatal() {
        let err = PriceCatalog::build([("titan".to_string(), priced("bedrock", "0.1", "0.2"))]).unwrap_err();
        assert!(matches!(err, Error::CatalogLoad(_)));
    }

    #[test]
    fn test_malformed_price_is_fatal() {
        let err = PriceCatalog::build([("gpt-4".to_string(), priced("openai", "cheap", "0.03"))]).unwrap_err();
        match err {
            Error::InvalidPrice { model, field, value } => {
                assert_eq!(model, "gpt-4");
                assert_eq!(field, "input_cost_per_token");
                assert_eq!(value, "cheap");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_price_is_fatal() {
        let err = PriceCatalog::build([("gpt-4".to_string(), priced("openai", "-0.01", "0.03"))]).unwrap_err();
        assert!(matches!(err, Error::InvalidPrice { .. }));
    }

    #[test]
    fn test_catalog_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PriceCatalog>();
    }
}
