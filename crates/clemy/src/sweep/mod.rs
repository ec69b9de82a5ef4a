//! Region orchestration
//!
//! Discovers regions once, runs one worker task per region and collects
//! exactly one report from each through a channel, in arrival order.

pub mod filter;
pub mod report;
pub mod worker;

pub use report::{Report, ReportSummary, ReportWriter};
pub use worker::sweep_region;

use crate::aws::AmiOperations;
use crate::config::Config;
use crate::error::{FatalError, SweepError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Sweep every selected region concurrently.
///
/// `on_report` is called for each report as soon as its worker finishes.
/// Fails only if the region list cannot be fetched.
pub async fn sweep_all_regions<A, F>(
    api: Arc<A>,
    config: &Config,
    mut on_report: F,
) -> Result<Vec<Report>, FatalError>
where
    A: AmiOperations + 'static,
    F: FnMut(&Report),
{
    let discovered = api.describe_regions().await.map_err(FatalError::Regions)?;

    for requested in &config.regions {
        if !discovered.contains(requested) {
            warn!(region = %requested, "Requested region is not enabled for this account");
        }
    }

    let regions: Vec<String> = discovered
        .into_iter()
        .filter(|r| config.includes_region(r))
        .collect();

    info!(
        regions = regions.len(),
        dry_run = config.dry_run,
        max_age_days = config.max_age_days,
        instance_scope = ?config.instance_scope,
        "Sweeping regions"
    );

    let expected = regions.len();
    let (tx, mut rx) = mpsc::channel::<Report>(expected.max(1));
    let config = Arc::new(config.clone());

    for region in regions {
        let api = Arc::clone(&api);
        let config = Arc::clone(&config);
        let tx = tx.clone();
        let dry_run = config.dry_run;

        let worker = tokio::spawn({
            let region = region.clone();
            async move { sweep_region(api.as_ref(), &config, region).await }
        });

        // Monitor the worker so a panic still yields the region's report
        tokio::spawn(async move {
            let report = match worker.await {
                Ok(report) => report,
                Err(e) => {
                    if e.is_panic() {
                        error!(region = %region, error = ?e, "Region worker panicked");
                    } else {
                        error!(region = %region, error = ?e, "Region worker cancelled");
                    }
                    let mut report = Report::new(region, dry_run);
                    report.add_error(SweepError::WorkerFailed(e));
                    report
                }
            };
            // The receiver outlives every worker
            let _ = tx.send(report).await;
        });
    }
    drop(tx);

    let mut reports = Vec::with_capacity(expected);
    while let Some(report) = rx.recv().await {
        info!(
            region = %report.region(),
            removed = report.removed().len(),
            errors = report.errors().len(),
            "Region finished"
        );
        on_report(&report);
        reports.push(report);
    }

    if reports.len() != expected {
        error!(
            expected,
            received = reports.len(),
            "Some region workers exited without a report"
        );
    }

    Ok(reports)
}
