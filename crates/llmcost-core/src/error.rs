//! Error types for llmcost

use thiserror::Error;

/// Result type alias using llmcost's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for llmcost operations
///
/// Every variant is a startup-time failure. Per-call cost estimation never
/// returns an error; it degrades to a zero cost instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The price catalog could not be built
    #[error("Failed to load model prices: {0}")]
    CatalogLoad(String),

    /// A price field is not a well-formed, non-negative decimal
    #[error("Invalid price for {model}.{field}: '{value}'")]
    InvalidPrice {
        /// Model identifier as it appears in the price definitions
        model: String,
        /// Name of the offending price field
        field: &'static str,
        /// Raw value that failed to parse
        value: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration source error
    #[error("Configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a catalog load error
    pub fn catalog_load(msg: impl Into<String>) -> Self {
        Self::CatalogLoad(msg.into())
    }

    /// Create an invalid price error
    pub fn invalid_price(model: impl Into<String>, field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidPrice {
            model: model.into(),
            field,
            value: value.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
