//! Configuration module for harvest runs
//!
//! Provides `HarvestConfig` and its type-safe builder with validation and
//! defaults matching the review listing.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, HarvestConfigBuilder, WithBaseUrl};
pub use types::HarvestConfig;
