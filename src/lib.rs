pub mod browser_setup;
pub mod config;
pub mod export;
pub mod extractor;
pub mod harvest_engine;
pub mod reveal;
pub mod session;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::HarvestConfig;
pub use export::{CsvSink, JsonSink, RecordSink, sink_for_path};
pub use extractor::{RecordExtractor, ReviewDate, ReviewRecord, StarRating};
pub use harvest_engine::{
    DelayPolicy, HarvestError, HarvestOutcome, HarvestReport, HarvestResult, HarvestSession,
    Harvester, NoDelay, StopReason, harvest, open_and_run, run_to_sink,
};
pub use reveal::{RevealOutcome, RevealSettings, reveal};
pub use session::{BrowserSession, NextAffordance, PageDriver};
