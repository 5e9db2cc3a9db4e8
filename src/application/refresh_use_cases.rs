//! Wishlist refresh use case
//!
//! Walks the working URL set one page at a time, extracts fresh fields,
//! reconciles them with the previous snapshot and writes the new snapshot.
//! Individual pages are allowed to fail; only persistence failures abort.

use std::collections::HashSet;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Dataset, ExtractedFields, MergeOutcome, ProductRecord, RecordMerger};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::dataset_repository::DatasetRepository;
use crate::infrastructure::http_client::{FetchError, PageFetcher};
use crate::infrastructure::pacing::PacingPolicy;
use crate::infrastructure::parsing::{ParsingError, ProductDetailParser};

/// Why one product page produced no fresh fields
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParsingError),
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Records rebuilt from this run's extraction
    pub refreshed: usize,
    /// Records carried over after a failed scrape
    pub from_cache: usize,
    /// URLs left out of the snapshot (failed, nothing cached)
    pub dropped: usize,
    /// URLs processed
    pub total: usize,
}

impl RefreshSummary {
    fn record(&mut self, outcome: &MergeOutcome) {
        match outcome {
            MergeOutcome::Refreshed(_) => self.refreshed += 1,
            MergeOutcome::FromCache(_) => self.from_cache += 1,
            MergeOutcome::Dropped => self.dropped += 1,
        }
    }

    /// Number of records written to the snapshot
    pub fn saved(&self) -> usize {
        self.refreshed + self.from_cache
    }
}

/// URLs to process this run, in order and without repeats
///
/// The user's list is authoritative when it exists, even if it drops products
/// that are still in the snapshot. Without a list the snapshot's own URLs are
/// refreshed.
pub fn resolve_target_urls(url_list: Option<Vec<String>>, prior: &Dataset) -> Vec<String> {
    match url_list {
        Some(urls) => {
            let mut seen = HashSet::new();
            urls.into_iter()
                .filter(|url| seen.insert(url.clone()))
                .collect()
        }
        None => prior.urls(),
    }
}

/// Refresh every tracked product and persist the result
pub struct RefreshUseCase<F, R> {
    fetcher: F,
    repository: R,
    parser: ProductDetailParser,
    merger: RecordMerger,
    pacing: PacingPolicy,
}

impl<F, R> RefreshUseCase<F, R>
where
    F: PageFetcher,
    R: DatasetRepository,
{
    pub fn new(
        fetcher: F,
        repository: R,
        parser: ProductDetailParser,
        merger: RecordMerger,
        pacing: PacingPolicy,
    ) -> Self {
        Self {
            fetcher,
            repository,
            parser,
            merger,
            pacing,
        }
    }

    /// Build the use case from application configuration
    pub fn from_config(fetcher: F, repository: R, config: &AppConfig) -> Result<Self> {
        let parser = ProductDetailParser::with_config(&config.parsing)
            .context("Invalid parsing configuration")?;
        Ok(Self::new(
            fetcher,
            repository,
            parser,
            RecordMerger::new(config.merge.clone()),
            config.pacing,
        ))
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Run one full refresh
    pub async fn run(&self) -> Result<RefreshSummary> {
        let prior = self
            .repository
            .load_dataset()
            .await
            .context("Failed to load previous dataset")?;
        let url_list = self
            .repository
            .load_url_list()
            .await
            .context("Failed to load URL list")?;

        if url_list.is_some() {
            info!("📋 Using URL list ({} records in previous snapshot)", prior.len());
        } else {
            info!("📋 No URL list, refreshing {} stored products", prior.len());
        }

        let targets = resolve_target_urls(url_list, &prior);
        let cache = prior.index_by_url();
        let mut summary = RefreshSummary {
            total: targets.len(),
            ..Default::default()
        };
        let mut products: Vec<ProductRecord> = Vec::with_capacity(targets.len());

        for (index, url) in targets.iter().enumerate() {
            info!("[{}/{}] 🔍 {}", index + 1, targets.len(), url);

            let fresh = match self.scrape(url).await {
                Ok(fields) => Some(fields),
                Err(e) => {
                    warn!("Failed to scrape {}: {}", url, e);
                    None
                }
            };

            let outcome = self.merger.merge_with_outcome(fresh, cache.get(url), url);
            summary.record(&outcome);
            match &outcome {
                MergeOutcome::Refreshed(record) => {
                    info!("✅ {} - {}", record.title, record.price);
                }
                MergeOutcome::FromCache(_) => info!("♻️ Kept cached record for {}", url),
                MergeOutcome::Dropped => warn!("Dropping {} (no cached record)", url),
            }
            if let Some(record) = outcome.into_record() {
                products.push(record);
            }

            if index + 1 < targets.len() {
                self.pacing.pause().await;
            }
        }

        let dataset = Dataset::stamped_now(products);
        self.repository
            .save_dataset(&dataset)
            .await
            .context("Failed to save dataset")?;

        info!(
            "🎉 Refresh complete: {} refreshed, {} from cache, {} dropped ({} saved)",
            summary.refreshed,
            summary.from_cache,
            summary.dropped,
            summary.saved()
        );
        Ok(summary)
    }

    async fn scrape(&self, url: &str) -> Result<ExtractedFields, ScrapeError> {
        let page = self.fetcher.fetch_page(url).await?;
        if page.final_url != url {
            debug!("{} redirected to {}", url, page.final_url);
        }
        Ok(self.parser.parse_page(&page.body, url)?)
    }
}
