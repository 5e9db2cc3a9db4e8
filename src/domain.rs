//! Domain module - Wishlist entities and merge rules
//!
//! Pure types and policies with no I/O:
//! - `product`: persisted records and transient extraction results
//! - `dataset`: the on-disk wishlist snapshot
//! - `product_url`: store identity and relative URL resolution
//! - `services`: record reconciliation between runs

pub mod dataset;
pub mod product;
pub mod product_url;
pub mod services;

// Re-export commonly used items for convenience
pub use dataset::Dataset;
pub use product::{ExtractedFields, Placeholders, ProductRecord};
pub use product_url::{StoreNaming, StoreResolver};
pub use services::{MergeOutcome, MergePolicy, MissingFieldPolicy, RecordMerger};
