//! Wishlist Scraper - product metadata extraction for personal wishlists
//!
//! Refreshes a JSON wishlist by scraping image, title and price from each
//! tracked product page, keeping the previous record when a page fails.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

pub use application::{RefreshSummary, RefreshUseCase};
pub use domain::{Dataset, ProductRecord};
