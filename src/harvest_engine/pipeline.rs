//! End-to-end harvest runs
//!
//! Couples the controller to a session and a sink, and guarantees the order
//! of teardown: stop harvesting, release the browser, then flush whatever
//! was collected.

use std::future::Future;
use tracing::{error, info, warn};

use super::accumulator::HarvestSession;
use super::controller::Harvester;
use super::harvest_types::{HarvestError, HarvestOutcome, HarvestResult, StopReason};
use crate::config::HarvestConfig;
use crate::export::{RecordSink, sink_for_path};
use crate::session::{BrowserSession, PageDriver};

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub outcome: HarvestOutcome,
    pub records_written: usize,
}

/// Harvest with `driver` until a stop condition or `shutdown` resolves
///
/// The driver is closed and the records persisted on every path, including
/// interruption and run errors.
///
/// # Errors
/// `EmptyCollection` when the first page produced nothing (after the empty
/// export has been written), export failures, and run errors.
pub async fn run_to_sink<D, S, F>(
    harvester: &Harvester,
    driver: &mut D,
    sink: &mut S,
    shutdown: F,
) -> HarvestResult<HarvestReport>
where
    D: PageDriver + ?Sized,
    S: RecordSink + ?Sized,
    F: Future<Output = ()>,
{
    let mut session = HarvestSession::new();

    let finished = tokio::select! {
        result = harvester.run(driver, &mut session) => Some(result),
        () = shutdown => None,
    };

    if let Err(e) = driver.close().await {
        warn!("Failed to release browser session: {}", e);
    }

    let outcome = match finished {
        Some(Ok(outcome)) => Ok(outcome),
        Some(Err(e)) => Err(e),
        None => {
            warn!(
                "Shutdown requested, stopping with {} records collected",
                session.len()
            );
            Ok(session.outcome(StopReason::Interrupted))
        }
    };

    let records_written = sink.persist(session.records())?;
    let outcome = outcome?;

    info!(
        "Harvest finished ({}): {} pages, {} records written",
        outcome.reason,
        outcome.pages.len(),
        records_written
    );

    if outcome.reason == StopReason::EmptyCollection {
        return Err(HarvestError::EmptyCollection);
    }

    Ok(HarvestReport {
        outcome,
        records_written,
    })
}

/// Open a driver with `open`, then harvest into `sink` like [`run_to_sink`]
///
/// A driver that fails to open still leaves an empty export behind.
///
/// # Errors
/// The opening error (after the empty export), plus everything
/// [`run_to_sink`] reports.
pub async fn open_and_run<D, O, S, F>(
    harvester: &Harvester,
    open: O,
    sink: &mut S,
    shutdown: F,
) -> HarvestResult<HarvestReport>
where
    D: PageDriver,
    O: Future<Output = HarvestResult<D>>,
    S: RecordSink + ?Sized,
    F: Future<Output = ()>,
{
    let mut driver = match open.await {
        Ok(driver) => driver,
        Err(e) => {
            error!("Could not open a browser session: {}", e);
            if let Err(flush) = sink.persist(&[]) {
                warn!("Failed to write empty export: {}", flush);
            }
            return Err(e);
        }
    };

    run_to_sink(harvester, &mut driver, sink, shutdown).await
}

/// Run a full harvest with a real browser, stopping early on Ctrl-C
///
/// # Errors
/// `SessionInit` when no browser can be started, plus everything
/// [`run_to_sink`] reports.
pub async fn harvest(config: &HarvestConfig) -> HarvestResult<HarvestReport> {
    let harvester = Harvester::new(config)?;
    let mut sink = sink_for_path(config.output_path());

    open_and_run(&harvester, BrowserSession::open(config), &mut sink, ctrl_c()).await
}

/// Resolves on Ctrl-C; never resolves if the handler can't be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C, shutdown signal disabled: {}", e);
        std::future::pending::<()>().await;
    }
}
