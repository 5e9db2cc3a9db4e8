//! Parsing context for product detail pages
//!
//! Carries what the extraction rules need to know about the page besides its
//! markup.

/// Detail parsing context for one product page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailParseContext {
    /// Product URL as listed by the user; relative resources resolve against it
    pub url: String,

    /// Store label already derived from `url`
    pub store: String,
}

impl DetailParseContext {
    /// Create new detail parse context
    pub fn new(url: impl Into<String>, store: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            store: store.into(),
        }
    }

    /// Lowercased host of the product URL, if it has one
    pub fn host(&self) -> Option<String> {
        crate::domain::product_url::host_of(&self.url)
    }
}
