//! Infrastructure layer: HTTP fetching, HTML parsing, persistence and process setup

pub mod config; // Configuration file and defaults
pub mod dataset_repository;
pub mod http_client;
pub mod logging;
pub mod pacing;
pub mod parsing; // Per-field extraction rule chains
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, LoggingConfig};
pub use dataset_repository::{DatasetRepository, JsonDatasetRepository};
pub use http_client::{FetchError, FetchedPage, HttpClient, HttpClientConfig, PageFetcher};
pub use logging::{bootstrap_console_logging, get_log_directory, init_logging_with_config};
pub use pacing::PacingPolicy;
pub use parsing::{ParsingConfig, ParsingError, ParsingResult, PriceNormalizer, ProductDetailParser};
