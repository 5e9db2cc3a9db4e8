//! Price text normalization
//!
//! Turns arbitrary element or page text into a short display price such as
//! `R$ 1.299,90`. Patterns are tried in configuration order and the first one
//! that matches anywhere in the text decides the outcome.

use regex::Regex;
use tracing::debug;

use super::config::PriceNormalizerConfig;
use super::{ParsingError, ParsingResult};
use crate::utils::collapse_whitespace;

#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    patterns: Vec<Regex>,
    currency_prefix: String,
    currency_symbols: Vec<String>,
    max_match_chars: usize,
}

impl PriceNormalizer {
    /// Create a normalizer with the default Brazilian-real patterns
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&PriceNormalizerConfig::default())
    }

    /// Create a normalizer from configuration
    pub fn with_config(config: &PriceNormalizerConfig) -> ParsingResult<Self> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| ParsingError::invalid_pattern("price", p, e)))
            .collect::<ParsingResult<Vec<_>>>()?;

        Ok(Self {
            patterns,
            currency_prefix: config.currency_prefix.clone(),
            currency_symbols: config.currency_symbols.clone(),
            max_match_chars: config.max_match_chars,
        })
    }

    /// Canonical display price found in `raw`, if any
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let text = collapse_whitespace(raw);
        if text.is_empty() {
            return None;
        }

        let matched = self
            .patterns
            .iter()
            .find_map(|pattern| pattern.find(&text))?
            .as_str();

        let price = if self.has_currency_symbol(matched) {
            matched.to_string()
        } else {
            format!("{} {}", self.currency_prefix, matched)
        };

        if price.chars().count() > self.max_match_chars {
            debug!("Rejecting price candidate '{}' (longer than {} chars)", price, self.max_match_chars);
            return None;
        }

        Some(price)
    }

    fn has_currency_symbol(&self, matched: &str) -> bool {
        self.currency_symbols.iter().any(|s| matched.starts_with(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn normalizer() -> PriceNormalizer {
        PriceNormalizer::new().unwrap()
    }

    #[rstest]
    #[case("  R$ 1.299,90 à vista  ", "R$ 1.299,90")]
    #[case("R$ 299,90", "R$ 299,90")]
    #[case("R$1.299,90", "R$1.299,90")]
    #[case("Por apenas\n  R$   49,99\n no PIX", "R$ 49,99")]
    #[case("$50.00", "$50.00")]
    #[case("US$ 19.99", "$ 19.99")]
    #[case("1.299,90", "R$ 1.299,90")]
    #[case("em 10x de 129,99", "R$ 129,99")]
    fn test_normalize_recognized_prices(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalizer().normalize(raw).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("no price here")]
    #[case("")]
    #[case("   ")]
    #[case("1.299,")]
    #[case("R$ 1234567890123,45")]
    #[case("98765432109876,54")]
    fn test_normalize_rejects(#[case] raw: &str) {
        assert_eq!(normalizer().normalize(raw), None);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let config = PriceNormalizerConfig {
            patterns: vec!["(".to_string()],
            ..Default::default()
        };
        let err = PriceNormalizer::with_config(&config).unwrap_err();
        assert!(matches!(err, ParsingError::InvalidPattern { .. }));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "[0-9R$., a-z]{0,32}") {
            let normalizer = normalizer();
            if let Some(price) = normalizer.normalize(&raw) {
                prop_assert_eq!(normalizer.normalize(&price), Some(price.clone()));
            }
        }
    }
}
