//! Provider and model name normalization

/// Separator between the model and provider halves of a catalog key
pub const MODEL_PROVIDER_SEPARATOR: char = '/';

/// Canonical provider name for an upstream provider identifier
///
/// Only these providers are priced; anything else maps to `None` and is
/// left out of the catalog.
pub fn canonical_provider(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("openai"),
        "vertex_ai-language-models" => Some("google_vertexai"),
        "gemini" => Some("google_ai"),
        "anthropic" => Some("anthropic"),
        "vertex_ai-anthropic_models" => Some("anthropic_vertexai"),
        _ => None,
    }
}

/// Strip a vendor path prefix ("vertex_ai/gemini-pro" -> "gemini-pro")
///
/// Only the segment before the first `/` is removed.
pub fn strip_vendor_prefix(model_name: &str) -> &str {
    model_name
        .split_once(MODEL_PROVIDER_SEPARATOR)
        .map_or(model_name, |(_, rest)| rest)
}

/// Build the catalog key for a model/provider pair
pub fn model_provider_key(model_name: &str, provider: &str) -> String {
    format!(
        "{}{}{}",
        strip_vendor_prefix(model_name),
        MODEL_PROVIDER_SEPARATOR,
        provider
    )
}
