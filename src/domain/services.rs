//! Domain services
//!
//! Contains business logic that doesn't naturally fit within entities.

pub mod record_merger;

pub use record_merger::{MergeOutcome, MergePolicy, MissingFieldPolicy, RecordMerger};
