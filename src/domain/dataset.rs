//! Wishlist dataset as stored on disk

use std::collections::{HashMap, HashSet};

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::product::ProductRecord;

/// Timestamp layout of `last_updated`
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Snapshot of the wishlist written at the end of every refresh run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

impl Dataset {
    /// Build a dataset stamped with the current local time
    pub fn stamped_now(products: Vec<ProductRecord>) -> Self {
        Self {
            last_updated: Local::now().format(LAST_UPDATED_FORMAT).to_string(),
            products,
        }
    }

    /// Product URLs in stored order, first occurrence wins
    pub fn urls(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .filter(|p| seen.insert(p.url.as_str()))
            .map(|p| p.url.clone())
            .collect()
    }

    /// Read-only lookup of prior records keyed by URL
    ///
    /// When a malformed file carries the same URL twice the first record is kept,
    /// consistent with [`Dataset::urls`].
    pub fn index_by_url(&self) -> HashMap<String, ProductRecord> {
        let mut index = HashMap::with_capacity(self.products.len());
        for product in &self.products {
            index
                .entry(product.url.clone())
                .or_insert_with(|| product.clone());
        }
        index
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, title: &str) -> ProductRecord {
        ProductRecord {
            image: "https://img.example.com/x.jpg".to_string(),
            title: title.to_string(),
            price: "R$ 10,00".to_string(),
            url: url.to_string(),
            store: "example.com".to_string(),
        }
    }

    #[test]
    fn test_urls_keep_order_and_drop_duplicates() {
        let dataset = Dataset {
            last_updated: String::new(),
            products: vec![
                record("https://a.com/1", "first"),
                record("https://b.com/2", "second"),
                record("https://a.com/1", "again"),
            ],
        };

        assert_eq!(dataset.urls(), vec!["https://a.com/1", "https://b.com/2"]);
    }

    #[test]
    fn test_index_prefers_first_record() {
        let dataset = Dataset {
            last_updated: String::new(),
            products: vec![
                record("https://a.com/1", "first"),
                record("https://a.com/1", "again"),
            ],
        };

        let index = dataset.index_by_url();
        assert_eq!(index.len(), 1);
        assert_eq!(index["https://a.com/1"].title, "first");
    }

    #[test]
    fn test_missing_keys_deserialize_to_empty() {
        let dataset: Dataset = serde_json::from_str("{}").unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.last_updated.is_empty());
    }

    #[test]
    fn test_stamp_uses_wishlist_layout() {
        let dataset = Dataset::stamped_now(Vec::new());
        assert!(chrono::NaiveDateTime::parse_from_str(&dataset.last_updated, LAST_UPDATED_FORMAT).is_ok());
    }
}
