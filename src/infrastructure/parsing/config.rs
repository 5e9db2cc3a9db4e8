//! Parsing configuration for HTML extraction
//!
//! Centralized configuration for CSS selectors, regex patterns and limits.
//! Each field cascade runs its groups in a fixed order (structured metadata,
//! store hooks, heuristic CSS, full-text scan); the entries inside each group
//! are data and tried in list order.

use serde::{Deserialize, Serialize};

use crate::domain::product_url::{MerchantLabel, StoreNaming, default_merchant_labels};
use crate::infrastructure::config::defaults;

/// Main parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub image: ImageSelectors,
    pub title: TitleSelectors,
    pub price: PriceSelectors,
    pub price_normalizer: PriceNormalizerConfig,
    pub store: StoreConfig,

    /// Maximum stored title length in characters
    pub title_max_chars: usize,

    /// End truncated titles with `...` (still within `title_max_chars`)
    pub title_ellipsis: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            image: ImageSelectors::default(),
            title: TitleSelectors::default(),
            price: PriceSelectors::default(),
            price_normalizer: PriceNormalizerConfig::default(),
            store: StoreConfig::default(),
            title_max_chars: defaults::TITLE_MAX_CHARS,
            title_ellipsis: false,
        }
    }
}

/// Selector plus the attribute holding the value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSelector {
    pub selector: String,
    pub attribute: String,
}

impl AttributeSelector {
    pub fn new(selector: &str, attribute: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

/// Selector that only applies to one merchant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHook {
    /// Substring of the store host, e.g. `amazon`
    pub store_fragment: String,
    pub selector: String,
    pub attribute: String,
}

/// Image cascade
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSelectors {
    /// Link-preview metadata, most trusted first
    pub metadata: Vec<AttributeSelector>,
    pub store_hooks: Vec<StoreHook>,
    /// Matched against each class token of `<img>` elements
    pub class_pattern: String,
}

impl Default for ImageSelectors {
    fn default() -> Self {
        Self {
            metadata: vec![
                AttributeSelector::new(r#"meta[property="og:image"]"#, "content"),
                AttributeSelector::new(r#"meta[name="twitter:image"]"#, "content"),
                AttributeSelector::new(r#"link[rel="image_src"]"#, "href"),
            ],
            store_hooks: vec![StoreHook {
                store_fragment: "amazon".to_string(),
                selector: "img#landingImage".to_string(),
                attribute: "src".to_string(),
            }],
            class_pattern: r"(?i)product|main|zoom|gallery".to_string(),
        }
    }
}

/// Title cascade
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleSelectors {
    pub metadata: Vec<AttributeSelector>,
    /// Elements whose text is used as the title
    pub text: Vec<String>,
    /// Marketplace names stripped from ` | Name ...` title suffixes
    pub known_marketplaces: Vec<String>,
}

impl Default for TitleSelectors {
    fn default() -> Self {
        Self {
            metadata: vec![AttributeSelector::new(r#"meta[property="og:title"]"#, "content")],
            text: vec!["title".to_string(), "h1".to_string()],
            known_marketplaces: ["Amazon", "Mercado Livre", "Shopee", "Magalu", "Kabum"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Price cascade
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSelectors {
    /// Raw amount metadata, prefixed with the currency as-is
    pub metadata: Vec<AttributeSelector>,
    /// Known marketplaces first, generic fallbacks last
    pub elements: Vec<String>,
    /// Last-resort scan over the whole page text
    pub page_text_pattern: String,
}

impl Default for PriceSelectors {
    fn default() -> Self {
        Self {
            metadata: vec![AttributeSelector::new(
                r#"meta[property="og:price:amount"]"#,
                "content",
            )],
            elements: [
                // Amazon
                ".a-price-whole",
                "#priceblock_ourprice",
                "#priceblock_dealprice",
                "span.a-offscreen",
                // Mercado Livre
                ".andes-money-amount__fraction",
                ".price-tag-fraction",
                // Magalu
                r#"[data-testid="price-value"]"#,
                ".price-template__text",
                // Kabum
                ".finalPrice",
                ".priceCard",
                // Shopee
                ".item-price",
                // Generic
                ".price",
                ".product-price",
                ".sale-price",
                ".special-price",
                r#"[itemprop="price"]"#,
                ".current-price",
                ".valor",
                ".preco",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            page_text_pattern: r"R\$\s*\d+\.?\d*,\d{2}".to_string(),
        }
    }
}

/// Price text recognition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceNormalizerConfig {
    /// Tried in order; the first pattern that matches decides
    pub patterns: Vec<String>,
    /// Prepended (with a space) when the match carries no currency symbol
    pub currency_prefix: String,
    /// Symbols that count as an explicit currency
    pub currency_symbols: Vec<String>,
    /// Longer matches are treated as noise
    pub max_match_chars: usize,
}

impl Default for PriceNormalizerConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                // R$ 1.299,90 / R$ 299,90
                r"R\$\s*\d+\.?\d*,\d{2}".to_string(),
                // R$ 299,90
                r"R\$\s*\d+,\d{2}".to_string(),
                // $50.00
                r"\$\s*\d+\.\d{2}".to_string(),
                // 1.299,90
                r"\d+\.?\d*,\d{2}".to_string(),
            ],
            currency_prefix: defaults::CURRENCY_PREFIX.to_string(),
            currency_symbols: vec!["R$".to_string(), "$".to_string()],
            max_match_chars: defaults::PRICE_MAX_MATCH_CHARS,
        }
    }
}

/// Store label derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub naming: StoreNaming,
    pub merchants: Vec<MerchantLabel>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            naming: StoreNaming::default(),
            merchants: default_merchant_labels(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cascades_start_with_opengraph() {
        let config = ParsingConfig::default();
        assert_eq!(config.image.metadata[0].selector, r#"meta[property="og:image"]"#);
        assert_eq!(config.title.metadata[0].selector, r#"meta[property="og:title"]"#);
        assert_eq!(config.price.metadata[0].selector, r#"meta[property="og:price:amount"]"#);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config: ParsingConfig =
            serde_json::from_str(r#"{ "title_max_chars": 80, "title_ellipsis": true }"#).unwrap();
        assert_eq!(config.title_max_chars, 80);
        assert!(config.title_ellipsis);
        assert_eq!(config.price.elements.len(), 19);
        assert_eq!(config.price_normalizer.max_match_chars, 15);
    }
}
