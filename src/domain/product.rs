use serde::{Deserialize, Serialize};

/// Persisted wishlist entry, one per product URL
///
/// Field order matches the on-disk layout consumed by the wishlist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub image: String,
    pub title: String,
    pub price: String,
    pub url: String,
    pub store: String,
}

/// Best-effort fields pulled from a single product page
///
/// `None` means no rule in the field's fallback chain produced a value.
/// The store label is always derivable from the URL, so it is not optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub image: Option<String>,
    pub title: Option<String>,
    pub price: Option<String>,
    pub store: String,
}

impl ExtractedFields {
    /// True when no page-derived field was found
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.title.is_none() && self.price.is_none()
    }

    /// Names of the fields that fell through every rule
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.image.is_none() {
            missing.push("image");
        }
        if self.title.is_none() {
            missing.push("title");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        missing
    }
}

/// Sentinel values substituted for fields that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholders {
    pub image: String,
    pub title: String,
    pub price: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        use crate::infrastructure::config::defaults;
        Self {
            image: defaults::PLACEHOLDER_IMAGE.to_string(),
            title: defaults::PLACEHOLDER_TITLE.to_string(),
            price: defaults::PLACEHOLDER_PRICE.to_string(),
        }
    }
}
