//! Harvest Engine Module
//!
//! The pagination controller, the accumulator it feeds, and the pipeline
//! that ties a browser session and an export sink to a run.

// Sub-modules
pub mod accumulator;
pub mod controller;
pub mod delay;
pub mod harvest_types;
pub mod page_timeout;
pub mod pipeline;

// Re-exports for public API
pub use accumulator::HarvestSession;
pub use controller::{Harvester, Transition, decide};
pub use delay::{DelayPolicy, FixedDelay, JitterDelay, NoDelay};
pub use harvest_types::{
    HarvestError, HarvestOutcome, HarvestResult, PageReport, PageState, PageStatus, StopReason,
};
pub use pipeline::{HarvestReport, harvest, open_and_run, run_to_sink};
