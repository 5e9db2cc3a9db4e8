//! Reconciles a fresh extraction with the previously stored record for the same URL

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::product::{ExtractedFields, Placeholders, ProductRecord};

/// What to put in a field that the fresh scrape could not find
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Static placeholder, even if an older value is cached
    #[default]
    Placeholder,
    /// Cached value when one exists, placeholder otherwise
    Cached,
}

/// Merge behaviour knobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    #[serde(default)]
    pub missing_field_policy: MissingFieldPolicy,

    /// Keep the stored title of already-tracked products and refresh only
    /// price and image
    #[serde(default)]
    pub keep_cached_title: bool,

    #[serde(default)]
    pub placeholders: Placeholders,
}

/// Result of merging one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Built from this run's extraction
    Refreshed(ProductRecord),
    /// Extraction failed; previous record carried over as-is
    FromCache(ProductRecord),
    /// Extraction failed and nothing was cached
    Dropped,
}

impl MergeOutcome {
    pub fn into_record(self) -> Option<ProductRecord> {
        match self {
            Self::Refreshed(record) | Self::FromCache(record) => Some(record),
            Self::Dropped => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordMerger {
    policy: MergePolicy,
}

impl RecordMerger {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    /// Record to persist for `url`, or `None` when the URL drops out this run
    pub fn merge(
        &self,
        fresh: Option<ExtractedFields>,
        cached: Option<&ProductRecord>,
        url: &str,
    ) -> Option<ProductRecord> {
        self.merge_with_outcome(fresh, cached, url).into_record()
    }

    pub fn merge_with_outcome(
        &self,
        fresh: Option<ExtractedFields>,
        cached: Option<&ProductRecord>,
        url: &str,
    ) -> MergeOutcome {
        let Some(fresh) = fresh else {
            return match cached {
                Some(record) => {
                    debug!("Extraction failed for {}, keeping cached record", url);
                    MergeOutcome::FromCache(record.clone())
                }
                None => {
                    debug!("Extraction failed for {} and nothing is cached", url);
                    MergeOutcome::Dropped
                }
            };
        };

        let placeholders = &self.policy.placeholders;
        let backfill = match self.policy.missing_field_policy {
            MissingFieldPolicy::Placeholder => None,
            MissingFieldPolicy::Cached => cached,
        };

        let title = match cached {
            Some(record) if self.policy.keep_cached_title => record.title.clone(),
            _ => fill(fresh.title, backfill.map(|r| &r.title), &placeholders.title),
        };

        MergeOutcome::Refreshed(ProductRecord {
            image: fill(fresh.image, backfill.map(|r| &r.image), &placeholders.image),
            title,
            price: fill(fresh.price, backfill.map(|r| &r.price), &placeholders.price),
            url: url.to_string(),
            store: fresh.store,
        })
    }
}

fn fill(fresh: Option<String>, cached: Option<&String>, placeholder: &str) -> String {
    fresh
        .or_else(|| cached.cloned())
        .unwrap_or_else(|| placeholder.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.loja.com/p/1";

    fn cached_record() -> ProductRecord {
        ProductRecord {
            image: "https://www.loja.com/old.jpg".to_string(),
            title: "Título antigo".to_string(),
            price: "R$ 100,00".to_string(),
            url: URL.to_string(),
            store: "old-store".to_string(),
        }
    }

    fn partial() -> ExtractedFields {
        ExtractedFields {
            image: None,
            title: Some("Título novo".to_string()),
            price: None,
            store: "loja.com".to_string(),
        }
    }

    #[test]
    fn test_failure_with_cache_keeps_cached_record() {
        let merger = RecordMerger::default();
        let cached = cached_record();

        let outcome = merger.merge_with_outcome(None, Some(&cached), URL);
        assert_eq!(outcome, MergeOutcome::FromCache(cached));
    }

    #[test]
    fn test_failure_without_cache_drops_url() {
        let merger = RecordMerger::default();
        assert_eq!(merger.merge(None, None, URL), None);
    }

    #[test]
    fn test_partial_success_uses_placeholders_not_cache() {
        let merger = RecordMerger::default();
        let cached = cached_record();

        let record = merger.merge(Some(partial()), Some(&cached), URL).unwrap();
        let placeholders = Placeholders::default();

        assert_eq!(record.title, "Título novo");
        assert_eq!(record.image, placeholders.image);
        assert_eq!(record.price, placeholders.price);
        assert_eq!(record.store, "loja.com");
        assert_eq!(record.url, URL);
    }

    #[test]
    fn test_cached_policy_backfills_missing_fields() {
        let merger = RecordMerger::new(MergePolicy {
            missing_field_policy: MissingFieldPolicy::Cached,
            ..Default::default()
        });
        let cached = cached_record();

        let record = merger.merge(Some(partial()), Some(&cached), URL).unwrap();
        assert_eq!(record.title, "Título novo");
        assert_eq!(record.image, cached.image);
        assert_eq!(record.price, cached.price);
        // store is recomputed, never copied
        assert_eq!(record.store, "loja.com");
    }

    #[test]
    fn test_cached_policy_without_cache_falls_back_to_placeholders() {
        let merger = RecordMerger::new(MergePolicy {
            missing_field_policy: MissingFieldPolicy::Cached,
            ..Default::default()
        });

        let record = merger.merge(Some(partial()), None, URL).unwrap();
        assert_eq!(record.price, Placeholders::default().price);
    }

    #[test]
    fn test_keep_cached_title() {
        let merger = RecordMerger::new(MergePolicy {
            keep_cached_title: true,
            ..Default::default()
        });
        let cached = cached_record();

        let record = merger.merge(Some(partial()), Some(&cached), URL).unwrap();
        assert_eq!(record.title, cached.title);

        let new_product = merger.merge(Some(partial()), None, URL).unwrap();
        assert_eq!(new_product.title, "Título novo");
    }
}
