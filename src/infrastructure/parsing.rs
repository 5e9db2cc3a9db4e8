//! HTML parsing infrastructure for product pages
//!
//! Selector tables and regex patterns live in `config`, are compiled once into
//! per-field `rules::RuleChain`s, and are driven by `ProductDetailParser`.

pub mod config;
pub mod context;
pub mod error;
pub mod price_normalizer;
pub mod product_detail_parser;
pub mod rules;

// Re-export public types
pub use config::ParsingConfig;
pub use context::DetailParseContext;
pub use error::{ParsingError, ParsingResult};
pub use price_normalizer::PriceNormalizer;
pub use product_detail_parser::ProductDetailParser;
pub use rules::{ExtractionRule, RuleChain};

use scraper::Html;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}
