//! clemy - deregister stale, unused AMIs
//!
//! Scans every enabled EC2 region for images owned by the account that are
//! older than a configured age and referenced by neither an instance nor a
//! launch configuration, then deregisters them (or only reports them in
//! dry-run mode).

pub mod aws;
pub mod config;
pub mod error;
pub mod sweep;

pub use config::{Config, OutputFormat, Overrides};
pub use error::{ConfigError, FatalError, SweepError};
pub use sweep::{Report, ReportWriter};

use crate::aws::AmiOperations;
use std::io::Write;
use std::sync::Arc;
use tracing::warn;

/// Sweep all regions and write each report to `out` as it arrives.
pub async fn run<A, W>(config: &Config, api: Arc<A>, out: W) -> Result<Vec<Report>, FatalError>
where
    A: AmiOperations + 'static,
    W: Write,
{
    let mut writer = ReportWriter::new(out, config.format, config.verbose);

    let reports = sweep::sweep_all_regions(api, config, |report| {
        if let Err(e) = writer.write_report(report) {
            warn!(region = %report.region(), error = %e, "Failed to write report");
        }
    })
    .await?;

    if let Err(e) = writer.finish() {
        warn!(error = %e, "Failed to write report footer");
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::MockAmiOperations;
    use chrono::{Duration, Utc};
    use clemy_common::Image;
    use clemy_common::defaults::REPORT_DIVIDER;

    #[tokio::test]
    async fn test_malformed_max_age_makes_no_provider_calls() {
        // No expectations: any provider call panics
        let api = Arc::new(MockAmiOperations::new());
        let mut out = Vec::new();

        let result = match Config::from_lookup(|key| {
            (key == "CLEMY_MAX_AGE").then(|| "fortnight".to_string())
        }) {
            Ok(config) => run(&config, api, &mut out).await,
            Err(e) => Err(FatalError::from(e)),
        };

        assert!(matches!(result, Err(FatalError::Config(ConfigError::InvalidMaxAge { .. }))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_writes_dry_run_reports() {
        let mut api = MockAmiOperations::new();
        api.expect_describe_regions()
            .returning(|| Ok(vec!["us-east-2".to_string()]));
        api.expect_describe_owned_images().returning(|_| {
            Ok(vec![Image::new(
                "ami-0123",
                (Utc::now() - Duration::days(20)).to_rfc3339(),
            )])
        });
        api.expect_describe_instances().returning(|_, _| Ok(Vec::new()));
        api.expect_describe_launch_configurations()
            .returning(|_| Ok(Vec::new()));
        api.expect_deregister_image().never();

        let config = Config {
            dry_run: true,
            ..Config::default()
        };
        let mut out = Vec::new();
        let reports = run(&config, Arc::new(api), &mut out).await.unwrap();

        assert_eq!(reports.len(), 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!(
                "{REPORT_DIVIDER}\nRegion: us-east-2\nImages to be removed:\n  0: ami-0123\n{REPORT_DIVIDER}\n"
            )
        );
    }
}
