//! Usage data model
//!
//! Callers report usage as a flat map of counters. Different SDKs name the
//! same counter differently (`prompt_tokens` vs `input_tokens`, flattened
//! `original_usage.*` keys), so each dimension resolves through an ordered
//! list of accepted keys.

use std::collections::HashMap;

/// Usage counters for a single LLM call, keyed by dimension name
pub type UsageMap = HashMap<String, u64>;

/// A billable usage dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageDimension {
    /// Plain input (prompt) text tokens
    InputTokens,
    /// Output (completion) text tokens
    OutputTokens,
    /// Tokens written to the prompt cache
    CacheWriteTokens,
    /// Tokens served from the prompt cache
    CacheReadTokens,
    /// Number of input images
    ImageCount,
    /// Seconds of input audio
    AudioSeconds,
    /// Seconds of input video
    VideoSeconds,
}

impl UsageDimension {
    /// Accepted usage keys, in lookup order
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Self::InputTokens => &[
                "input_tokens",
                "prompt_tokens",
                "original_usage.input_tokens",
                "original_usage.prompt_tokens",
            ],
            Self::OutputTokens => &[
                "output_tokens",
                "completion_tokens",
                "original_usage.output_tokens",
                "original_usage.completion_tokens",
            ],
            Self::CacheWriteTokens => &[
                "cache_write_tokens",
                "cache_creation_input_tokens",
                "original_usage.cache_creation_input_tokens",
            ],
            Self::CacheReadTokens => &[
                "cache_read_tokens",
                "cache_read_input_tokens",
                "original_usage.cache_read_input_tokens",
                "original_usage.prompt_tokens_details.cached_tokens",
            ],
            Self::ImageCount => &["image_count", "original_usage.image_count"],
            Self::AudioSeconds => &["audio_seconds", "original_usage.audio_seconds"],
            Self::VideoSeconds => &["video_seconds", "original_usage.video_seconds"],
        }
    }

    /// Value of the first accepted key present in `usage`
    pub fn lookup(self, usage: &UsageMap) -> Option<u64> {
        self.keys().iter().find_map(|key| usage.get(*key).copied())
    }

    /// Whether `usage` reports this dimension at all (a zero counts)
    pub fn is_present(self, usage: &UsageMap) -> bool {
        self.lookup(usage).is_some()
    }

    /// Reported count, zero when absent
    pub fn count(self, usage: &UsageMap) -> u64 {
        self.lookup(usage).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn usage(pairs: &[(&str, u64)]) -> UsageMap {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[rstest]
    #[case::canonical("input_tokens", UsageDimension::InputTokens)]
    #[case::openai("prompt_tokens", UsageDimension::InputTokens)]
    #[case::openai_completion("completion_tokens", UsageDimension::OutputTokens)]
    #[case::anthropic_cache("original_usage.cache_read_input_tokens", UsageDimension::CacheReadTokens)]
    #[case::openai_cache("original_usage.prompt_tokens_details.cached_tokens", UsageDimension::CacheReadTokens)]
    #[case::flattened_image("original_usage.image_count", UsageDimension::ImageCount)]
    fn test_alias_keys_resolve(#[case] key: &str, #[case] dimension: UsageDimension) {
        let map = usage(&[(key, 42)]);
        assert_eq!(dimension.lookup(&map), Some(42));
    }

    #[test]
    fn test_first_key_wins() {
        let map = usage(&[("prompt_tokens", 10), ("input_tokens", 7)]);
        assert_eq!(UsageDimension::InputTokens.count(&map), 7);
    }

    #[test]
    fn test_absent_dimension() {
        let map = usage(&[("input_tokens", 10)]);
        assert!(!UsageDimension::ImageCount.is_present(&map));
        assert_eq!(UsageDimension::ImageCount.count(&map), 0);
    }

    #[test]
    fn test_zero_is_present() {
        let map = usage(&[("audio_seconds", 0)]);
        assert!(UsageDimension::AudioSeconds.is_present(&map));
    }
}
