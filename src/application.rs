//! Application layer module
//!
//! Use cases that orchestrate fetching, extraction, merging and persistence.

pub mod refresh_use_cases;

pub use refresh_use_cases::{RefreshSummary, RefreshUseCase, ScrapeError, resolve_target_urls};
