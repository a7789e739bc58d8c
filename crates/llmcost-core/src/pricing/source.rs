//! Price definition loading
//!
//! Reads the upstream `model_prices_and_context_window.json` document: a JSON
//! object keyed by model identifier whose values are price records.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, error};

use crate::error::Result;
use crate::models::RawPriceRecord;

/// Raw price definitions in document order
pub type RawPriceDefinitions = IndexMap<String, RawPriceRecord>;

/// Load price definitions from a JSON file
pub fn load_price_file(path: impl AsRef<Path>) -> Result<RawPriceDefinitions> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading model prices");

    let file = File::open(path).inspect_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to open model prices");
    })?;

    parse_price_definitions(BufReader::new(file))
}

/// Parse price definitions from any JSON reader
pub fn parse_price_definitions(reader: impl Read) -> Result<RawPriceDefinitions> {
    let definitions: RawPriceDefinitions = serde_json::from_reader(reader)?;
    debug!(records = definitions.len(), "Parsed model prices");
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    const PRICES: &str = r#"{
        "sample_spec": {
            "max_tokens": "LEGACY parameter",
            "input_cost_per_token": 0.0,
            "litellm_provider": "one of https://docs.litellm.ai/docs/providers"
        },
        "gpt-4o": {
            "input_cost_per_token": 0.0000025,
            "output_cost_per_token": 0.00001,
            "cache_read_input_token_cost": 0.00000125,
            "litellm_provider": "openai",
            "mode": "chat",
            "supports_vision": true
        },
        "claude-3-5-sonnet-20241022": {
            "input_cost_per_token": "0.000003",
            "output_cost_per_token": "0.000015",
            "cache_creation_input_token_cost": "0.00000375",
            "cache_read_input_token_cost": "0.0000003",
            "litellm_provider": "anthropic"
        }
    }"#;

    #[test]
    fn test_parse_keeps_document_order() {
        let definitions = parse_price_definitions(PRICES.as_bytes()).unwrap();
        let keys: Vec<&str> = definitions.keys().map(String::as_str).collect();
        assert_eq!(keys, ["sample_spec", "gpt-4o", "claude-3-5-sonnet-20241022"]);
        assert_eq!(
            definitions["claude-3-5-sonnet-20241022"].cache_write.as_deref(),
            Some("0.00000375")
        );
        assert!(definitions["gpt-4o"].cache_read.is_some());
    }

    #[test]
    fn test_load_price_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PRICES.as_bytes()).unwrap();

        let definitions = load_price_file(file.path()).unwrap();
        assert_eq!(definitions.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_price_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = parse_price_definitions("[1, 2".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
