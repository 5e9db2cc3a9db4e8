//! Product detail parser
//!
//! Best-effort extraction of image, title and price from an arbitrary
//! storefront page. Each field runs its own fallback chain, strongest
//! signal first (link-preview metadata, then merchant hooks, then heuristic
//! selectors, then a whole-page text scan). A field nobody could find is left
//! empty; missing fields are never an error here.

#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;

use regex::Regex;
use scraper::Html;
use tracing::debug;

use super::config::ParsingConfig;
use super::context::DetailParseContext;
use super::price_normalizer::PriceNormalizer;
use super::rules::{
    AttributeRule, ClassPatternImageRule, MetaAmountRule, PageTextPatternRule, PriceElementRule,
    RuleChain, StoreHookRule, TextRule, compile_pattern,
};
use super::{ContextualParser, ParsingError, ParsingResult};
use crate::domain::product::ExtractedFields;
use crate::domain::product_url::{StoreResolver, resolve_against};
use crate::utils::{collapse_whitespace, truncate_chars};

/// Parser for extracting product fields from product detail pages
pub struct ProductDetailParser {
    image_rules: RuleChain,
    title_rules: RuleChain,
    price_rules: RuleChain,

    /// Strips ` | Amazon ...` style suffixes; `None` when no marketplaces are configured
    title_suffix: Option<Regex>,
    title_max_chars: usize,
    title_ellipsis: bool,

    store_resolver: StoreResolver,
}

impl ProductDetailParser {
    /// Create a new product detail parser with default configuration
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Create parser with custom configuration
    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let normalizer = Arc::new(PriceNormalizer::with_config(&config.price_normalizer)?);

        Ok(Self {
            image_rules: Self::image_chain(config)?,
            title_rules: Self::title_chain(config)?,
            price_rules: Self::price_chain(config, normalizer)?,
            title_suffix: Self::compile_title_suffix(&config.title.known_marketplaces)?,
            title_max_chars: config.title_max_chars,
            title_ellipsis: config.title_ellipsis,
            store_resolver: StoreResolver::new(config.store.naming, config.store.merchants.clone()),
        })
    }

    fn image_chain(config: &ParsingConfig) -> ParsingResult<RuleChain> {
        let mut chain = RuleChain::new("image");
        for selector in &config.image.metadata {
            chain.push(AttributeRule::compile("image", selector)?);
        }
        for hook in &config.image.store_hooks {
            chain.push(StoreHookRule::compile("image", hook)?);
        }
        chain.push(ClassPatternImageRule::compile("image", &config.image.class_pattern)?);
        Ok(chain)
    }

    fn title_chain(config: &ParsingConfig) -> ParsingResult<RuleChain> {
        let mut chain = RuleChain::new("title");
        for selector in &config.title.metadata {
            chain.push(AttributeRule::compile("title", selector)?);
        }
        for selector in &config.title.text {
            chain.push(TextRule::compile("title", selector)?);
        }
        Ok(chain)
    }

    fn price_chain(config: &ParsingConfig, normalizer: Arc<PriceNormalizer>) -> ParsingResult<RuleChain> {
        let prefix = &config.price_normalizer.currency_prefix;
        let mut chain = RuleChain::new("price");
        for selector in &config.price.metadata {
            chain.push(MetaAmountRule::compile("price", selector, prefix)?);
        }
        for selector in &config.price.elements {
            chain.push(PriceElementRule::compile("price", selector, Arc::clone(&normalizer))?);
        }
        chain.push(PageTextPatternRule::compile(
            "price",
            &config.price.page_text_pattern,
            normalizer,
        )?);
        Ok(chain)
    }

    fn compile_title_suffix(marketplaces: &[String]) -> ParsingResult<Option<Regex>> {
        let names: Vec<String> = marketplaces
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(regex::escape)
            .collect();
        if names.is_empty() {
            return Ok(None);
        }

        let pattern = format!(r"(?i)\s*[|-]\s*({}).*$", names.join("|"));
        compile_pattern("title", &pattern).map(Some)
    }

    /// Extract every field from an already parsed page
    pub fn extract(&self, page: &Html, source_url: &str) -> ExtractedFields {
        let ctx = DetailParseContext::new(source_url, self.store_resolver.store_for(source_url));
        self.extract_with_context(page, &ctx)
    }

    /// Parse a fetched body and extract its fields
    ///
    /// Fails only when the body cannot be treated as a page at all.
    pub fn parse_page(&self, body: &str, source_url: &str) -> ParsingResult<ExtractedFields> {
        if body.trim().is_empty() {
            return Err(ParsingError::EmptyDocument {
                url: source_url.to_string(),
            });
        }

        let page = Html::parse_document(body);
        let ctx = DetailParseContext::new(source_url, self.store_resolver.store_for(source_url));
        self.parse_with_context(&page, &ctx)
    }

    fn extract_with_context(&self, page: &Html, ctx: &DetailParseContext) -> ExtractedFields {
        debug!("Parsing product detail from: {}", ctx.url);

        let image = self
            .image_rules
            .resolve(page, ctx, |raw| resolve_against(&ctx.url, raw));
        let title = self.title_rules.resolve(page, ctx, |raw| self.clean_title(raw));
        let price = self
            .price_rules
            .resolve(page, ctx, non_empty_price);

        let fields = ExtractedFields {
            image,
            title,
            price,
            store: ctx.store.clone(),
        };

        if !fields.missing_fields().is_empty() {
            debug!("Fields not found on {}: {:?}", ctx.url, fields.missing_fields());
        }
        fields
    }

    /// Collapse whitespace, drop the marketplace suffix and bound the length
    fn clean_title(&self, raw: &str) -> Option<String> {
        let collapsed = collapse_whitespace(raw);
        let stripped = match &self.title_suffix {
            Some(suffix) => suffix.replace(&collapsed, "").trim().to_string(),
            None => collapsed,
        };
        if stripped.is_empty() {
            return None;
        }
        Some(truncate_chars(&stripped, self.title_max_chars, self.title_ellipsis))
    }
}

/// Price rules already emit display strings; only blank ones are refused
fn non_empty_price(raw: &str) -> Option<String> {
    let price = collapse_whitespace(raw);
    (!price.is_empty()).then_some(price)
}

impl ContextualParser for ProductDetailParser {
    type Output = ExtractedFields;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        Ok(self.extract_with_context(html, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product_url::StoreNaming;

    const URL: &str = "https://www.loja.com.br/produtos/fone-bluetooth";

    fn parser() -> ProductDetailParser {
        ProductDetailParser::new().unwrap()
    }

    fn extract(html: &str, url: &str) -> ExtractedFields {
        parser().extract(&Html::parse_document(html), url)
    }

    #[test]
    fn test_parser_creation() {
        assert!(ProductDetailParser::new().is_ok());
    }

    #[test]
    fn test_opengraph_wins_over_other_signals() {
        let html = r#"
            <html><head>
              <title>Título da aba</title>
              <meta property="og:title" content="Fone Bluetooth JBL">
              <meta property="og:image" content="https://cdn.loja.com.br/og.jpg">
              <meta name="twitter:image" content="https://cdn.loja.com.br/tw.jpg">
              <meta property="og:price:amount" content="199.90">
            </head><body>
              <h1>Outro título</h1>
              <img class="product-main" src="https://cdn.loja.com.br/main.jpg">
              <span class="price">R$ 249,90</span>
            </body></html>"#;

        let fields = extract(html, URL);
        assert_eq!(fields.title.as_deref(), Some("Fone Bluetooth JBL"));
        assert_eq!(fields.image.as_deref(), Some("https://cdn.loja.com.br/og.jpg"));
        assert_eq!(fields.price.as_deref(), Some("R$ 199.90"));
        assert_eq!(fields.store, "loja.com.br");
    }

    #[test]
    fn test_relative_image_resolved_against_page() {
        let html = r#"<meta property="og:image" content="/img/p.jpg">"#;
        let fields = extract(html, URL);
        assert_eq!(fields.image.as_deref(), Some("https://www.loja.com.br/img/p.jpg"));

        let protocol_relative = r#"<link rel="image_src" href="//cdn.loja.com.br/p.jpg">"#;
        let fields = extract(protocol_relative, URL);
        assert_eq!(fields.image.as_deref(), Some("https://cdn.loja.com.br/p.jpg"));
    }

    #[test]
    fn test_non_web_image_falls_through() {
        let html = r#"
            <meta property="og:image" content="data:image/png;base64,AAAA">
            <meta name="twitter:image" content="https://cdn.loja.com.br/tw.jpg">"#;
        let fields = extract(html, URL);
        assert_eq!(fields.image.as_deref(), Some("https://cdn.loja.com.br/tw.jpg"));
    }

    #[test]
    fn test_amazon_landing_image_hook() {
        let html = r#"
            <img id="landingImage" src="https://m.media-amazon.com/images/I/61.jpg">
            <img class="main-image" src="https://m.media-amazon.com/other.jpg">"#;

        let amazon = extract(html, "https://www.amazon.com.br/dp/B0C1");
        assert_eq!(amazon.image.as_deref(), Some("https://m.media-amazon.com/images/I/61.jpg"));

        let elsewhere = extract(html, URL);
        assert_eq!(elsewhere.image.as_deref(), Some("https://m.media-amazon.com/other.jpg"));
    }

    #[test]
    fn test_title_suffix_stripped_and_truncated() {
        let html = "<title>\n  Smartphone   Galaxy A54 | Amazon.com.br\n</title>";
        let fields = extract(html, URL);
        assert_eq!(fields.title.as_deref(), Some("Smartphone Galaxy A54"));

        let html = "<h1>Kit Panelas - mercado livre</h1>";
        assert_eq!(extract(html, URL).title.as_deref(), Some("Kit Panelas"));

        let long = format!("<h1>{}</h1>", "Notebook ".repeat(40));
        let title = extract(&long, URL).title.unwrap();
        assert!(title.chars().count() <= 150);
    }

    #[test]
    fn test_title_that_is_only_a_suffix_is_absent() {
        let fields = extract("<title>| Shopee Brasil</title>", URL);
        assert_eq!(fields.title, None);
    }

    #[test]
    fn test_title_ellipsis_variant() {
        let config = ParsingConfig {
            title_max_chars: 20,
            title_ellipsis: true,
            ..Default::default()
        };
        let parser = ProductDetailParser::with_config(&config).unwrap();
        let page = Html::parse_document("<h1>Aspirador de pó vertical sem fio</h1>");
        let title = parser.extract(&page, URL).title.unwrap();
        assert!(title.ends_with("..."));
        assert!(title.chars().count() <= 20);
    }

    #[test]
    fn test_price_selector_priority_and_normalization() {
        let html = r#"
            <div class="price">R$ 10,00</div>
            <span class="andes-money-amount__fraction">  1.299,90 </span>"#;
        assert_eq!(extract(html, URL).price.as_deref(), Some("R$ 1.299,90"));
    }

    #[test]
    fn test_price_skips_elements_without_a_price() {
        let html = r#"
            <span class="a-price-whole">indisponível</span>
            <p class="preco">Por R$ 89,90 no PIX</p>"#;
        assert_eq!(extract(html, URL).price.as_deref(), Some("R$ 89,90"));
    }

    #[test]
    fn test_price_page_text_scan() {
        let html = "<body><p>Oferta: R$ 45,00 hoje</p></body>";
        assert_eq!(extract(html, URL).price.as_deref(), Some("R$ 45,00"));
    }

    #[test]
    fn test_price_split_across_elements() {
        let html = "<body><p>Oferta R$</p>\n\n      <p>45,00</p></body>";
        assert_eq!(extract(html, URL).price.as_deref(), Some("R$ 45,00"));
    }

    #[test]
    fn test_page_text_digit_run_is_not_a_price() {
        let html = "<body><p>Total: R$ 98765432109876,54</p></body>";
        assert_eq!(extract(html, URL).price, None);
    }

    #[test]
    fn test_missing_everything_is_not_an_error() {
        let fields = extract("<html><body><p>nada</p></body></html>", URL);
        assert!(fields.is_empty());
        assert_eq!(fields.store, "loja.com.br");
    }

    #[test]
    fn test_known_merchant_store_naming() {
        let mut config = ParsingConfig::default();
        config.store.naming = StoreNaming::KnownMerchant;
        let parser = ProductDetailParser::with_config(&config).unwrap();
        let page = Html::parse_document("<p></p>");
        assert_eq!(
            parser.extract(&page, "https://www.mercadolivre.com.br/p/MLB1").store,
            "Mercado Livre"
        );
        assert_eq!(parser.extract(&page, URL).store, "Store");
    }

    #[test]
    fn test_empty_body_is_page_error() {
        let err = parser().parse_page("   ", URL).unwrap_err();
        assert!(matches!(err, ParsingError::EmptyDocument { .. }));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"<meta property="og:title" content="Mouse"><span class="price">R$ 99,90</span>"#;
        let parser = parser();
        let first = parser.parse_page(html, URL).unwrap();
        let second = parser.parse_page(html, URL).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_configured_selector_rejected() {
        let mut config = ParsingConfig::default();
        config.price.elements.push("div[".to_string());
        assert!(matches!(
            ProductDetailParser::with_config(&config),
            Err(ParsingError::InvalidSelector { .. })
        ));
    }
}
