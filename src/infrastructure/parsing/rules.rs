//! Extraction rules and per-field fallback chains
//!
//! A rule looks at one signal on the page (a metadata tag, a merchant-specific
//! element, a page-wide text scan) and either produces a raw value or passes.
//! A `RuleChain` runs its rules in order and stops at the first value the
//! field accepts.

use std::sync::Arc;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::config::{AttributeSelector, StoreHook};
use super::context::DetailParseContext;
use super::price_normalizer::PriceNormalizer;
use super::{ParsingError, ParsingResult};
use crate::utils::collapse_whitespace;

/// One step of a field's fallback cascade
pub trait ExtractionRule: Send + Sync {
    /// Short description used in debug logs
    fn name(&self) -> &str;

    /// Raw value for the field, or `None` to fall through to the next rule
    fn apply(&self, page: &Html, ctx: &DetailParseContext) -> Option<String>;
}

/// Compile a CSS selector, naming the field on failure
pub fn compile_selector(field: &str, selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(field, selector, e))
}

/// Compile a regex, naming the field on failure
pub fn compile_pattern(field: &str, pattern: &str) -> ParsingResult<Regex> {
    Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(field, pattern, e))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Attribute of the first element matching a selector
pub struct AttributeRule {
    name: String,
    selector: Selector,
    attribute: String,
}

impl AttributeRule {
    pub fn compile(field: &str, target: &AttributeSelector) -> ParsingResult<Self> {
        Ok(Self {
            name: format!("{}@{}", target.selector, target.attribute),
            selector: compile_selector(field, &target.selector)?,
            attribute: target.attribute.clone(),
        })
    }
}

impl ExtractionRule for AttributeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, page: &Html, _ctx: &DetailParseContext) -> Option<String> {
        let element = page.select(&self.selector).next()?;
        element.value().attr(&self.attribute).and_then(non_empty)
    }
}

/// Attribute rule that only fires for one merchant's pages
pub struct StoreHookRule {
    store_fragment: String,
    inner: AttributeRule,
}

impl StoreHookRule {
    pub fn compile(field: &str, hook: &StoreHook) -> ParsingResult<Self> {
        let target = AttributeSelector::new(&hook.selector, &hook.attribute);
        Ok(Self {
            store_fragment: hook.store_fragment.to_lowercase(),
            inner: AttributeRule::compile(field, &target)?,
        })
    }
}

impl ExtractionRule for StoreHookRule {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn apply(&self, page: &Html, ctx: &DetailParseContext) -> Option<String> {
        let host = ctx.host()?;
        if !host.contains(&self.store_fragment) {
            return None;
        }
        self.inner.apply(page, ctx)
    }
}

/// First `<img>` with a `src` and a class token matching a pattern
pub struct ClassPatternImageRule {
    images: Selector,
    class_pattern: Regex,
}

impl ClassPatternImageRule {
    pub fn compile(field: &str, class_pattern: &str) -> ParsingResult<Self> {
        Ok(Self {
            images: compile_selector(field, "img[src]")?,
            class_pattern: compile_pattern(field, class_pattern)?,
        })
    }

    fn has_matching_class(&self, element: ElementRef<'_>) -> bool {
        element
            .value()
            .classes()
            .any(|class| self.class_pattern.is_match(class))
    }
}

impl ExtractionRule for ClassPatternImageRule {
    fn name(&self) -> &str {
        "img.class~pattern"
    }

    fn apply(&self, page: &Html, _ctx: &DetailParseContext) -> Option<String> {
        page.select(&self.images)
            .filter(|img| self.has_matching_class(*img))
            .find_map(|img| img.value().attr("src").and_then(non_empty))
    }
}

/// Whitespace-collapsed text of the first element matching a selector
pub struct TextRule {
    name: String,
    selector: Selector,
}

impl TextRule {
    pub fn compile(field: &str, selector: &str) -> ParsingResult<Self> {
        Ok(Self {
            name: selector.to_string(),
            selector: compile_selector(field, selector)?,
        })
    }
}

impl ExtractionRule for TextRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, page: &Html, _ctx: &DetailParseContext) -> Option<String> {
        let element = page.select(&self.selector).next()?;
        non_empty(&element_text(element))
    }
}

/// Raw amount metadata, shown with the currency prefix in front
pub struct MetaAmountRule {
    inner: AttributeRule,
    currency_prefix: String,
}

impl MetaAmountRule {
    pub fn compile(field: &str, target: &AttributeSelector, currency_prefix: &str) -> ParsingResult<Self> {
        Ok(Self {
            inner: AttributeRule::compile(field, target)?,
            currency_prefix: currency_prefix.to_string(),
        })
    }
}

impl ExtractionRule for MetaAmountRule {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn apply(&self, page: &Html, ctx: &DetailParseContext) -> Option<String> {
        let amount = self.inner.apply(page, ctx)?;
        Some(format!("{} {}", self.currency_prefix, amount))
    }
}

/// First element's text, accepted only if it normalizes to a price
pub struct PriceElementRule {
    name: String,
    selector: Selector,
    normalizer: Arc<PriceNormalizer>,
}

impl PriceElementRule {
    pub fn compile(field: &str, selector: &str, normalizer: Arc<PriceNormalizer>) -> ParsingResult<Self> {
        Ok(Self {
            name: selector.to_string(),
            selector: compile_selector(field, selector)?,
            normalizer,
        })
    }
}

impl ExtractionRule for PriceElementRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, page: &Html, _ctx: &DetailParseContext) -> Option<String> {
        let element = page.select(&self.selector).next()?;
        self.normalizer.normalize(&element_text(element))
    }
}

/// First match of a pattern anywhere in the page text, normalized to a price
///
/// The page text is collapsed first so a currency symbol and its amount
/// split across elements still read as one price.
pub struct PageTextPatternRule {
    pattern: Regex,
    normalizer: Arc<PriceNormalizer>,
}

impl PageTextPatternRule {
    pub fn compile(field: &str, pattern: &str, normalizer: Arc<PriceNormalizer>) -> ParsingResult<Self> {
        Ok(Self {
            pattern: compile_pattern(field, pattern)?,
            normalizer,
        })
    }
}

impl ExtractionRule for PageTextPatternRule {
    fn name(&self) -> &str {
        self.pattern.as_str()
    }

    fn apply(&self, page: &Html, _ctx: &DetailParseContext) -> Option<String> {
        let text = collapse_whitespace(&page.root_element().text().collect::<String>());
        let matched = self.pattern.find(&text)?;
        self.normalizer.normalize(matched.as_str())
    }
}

/// Ordered fallback rules for one field
pub struct RuleChain {
    field: &'static str,
    rules: Vec<Box<dyn ExtractionRule>>,
}

impl RuleChain {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    pub fn push(&mut self, rule: impl ExtractionRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// First raw value that `accept` turns into a final value
    pub fn resolve<F>(&self, page: &Html, ctx: &DetailParseContext, accept: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        for rule in &self.rules {
            let Some(raw) = rule.apply(page, ctx) else {
                continue;
            };
            match accept(&raw) {
                Some(value) => {
                    debug!("Extracted {} using {}: {}", self.field, rule.name(), value);
                    return Some(value);
                }
                None => debug!("Discarded {} candidate from {}: {}", self.field, rule.name(), raw),
            }
        }

        debug!("No {} found for {} after {} rules", self.field, ctx.url, self.rules.len());
        None
    }
}
