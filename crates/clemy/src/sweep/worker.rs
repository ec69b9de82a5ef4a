//! Region worker
//!
//! Fetches the three datasets for one region, selects candidates and, unless
//! in dry-run mode, deregisters them. Every failure lands in the returned
//! report; nothing escapes to the caller.

use super::filter::select_candidates;
use super::report::Report;
use crate::aws::AmiOperations;
use crate::config::Config;
use crate::error::SweepError;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Sweep a single region and return its report
pub async fn sweep_region<A>(api: &A, config: &Config, region: String) -> Report
where
    A: AmiOperations + ?Sized,
{
    let mut report = Report::new(region.as_str(), config.dry_run);

    // Fetching
    let Some(images) = report.record(
        api.describe_owned_images(&region)
            .await
            .map_err(SweepError::Images),
    ) else {
        return report;
    };

    let (instances, launch_configurations) = tokio::join!(
        api.describe_instances(&region, config.instance_scope),
        api.describe_launch_configurations(&region),
    );
    let instances = report.record(instances.map_err(SweepError::Instances));
    let launch_configurations =
        report.record(launch_configurations.map_err(SweepError::LaunchConfigurations));
    let (Some(instances), Some(launch_configurations)) = (instances, launch_configurations) else {
        warn!(region = %region, "Skipping region after fetch failure");
        return report;
    };

    // Filtering
    let owned = images.len();
    let candidates = select_candidates(
        images,
        &instances,
        &launch_configurations,
        config.max_age(),
        Utc::now(),
        &mut report,
    );
    debug!(
        region = %region,
        owned,
        instances = instances.len(),
        launch_configurations = launch_configurations.len(),
        candidates = candidates.len(),
        "Selected candidates"
    );

    // Deregistering
    if config.dry_run {
        for image in &candidates {
            info!(region = %region, image_id = %image.image_id, "[DRY RUN] Would deregister");
        }
    } else {
        for image in &candidates {
            info!(region = %region, image_id = %image.image_id, "Deregistering");
            if let Err(source) = api.deregister_image(&region, &image.image_id).await {
                warn!(
                    region = %region,
                    image_id = %image.image_id,
                    error = %source,
                    "Failed to deregister"
                );
                report.add_error(SweepError::Deregister {
                    image_id: image.image_id.clone(),
                    source,
                });
            }
        }
    }

    report.set_removed(candidates);
    report
}
