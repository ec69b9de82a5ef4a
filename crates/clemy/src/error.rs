//! Configuration, per-region and fatal errors

use crate::aws::AwsError;
use thiserror::Error;

/// Configuration errors; the operator must fix these before anything runs
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Max age is not a non-negative integer
    #[error("{source_name} must be a non-negative integer number of days, got '{value}'")]
    InvalidMaxAge {
        source_name: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Errors recorded in a region's report.
///
/// None of these cross region boundaries; each ends up as one entry in the
/// printed report of the region that hit it.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Owned image listing failed; nothing else runs for the region
    #[error("describing owned images: {0}")]
    Images(#[source] AwsError),

    /// Instance listing failed; the candidate set is discarded
    #[error("describing instances: {0}")]
    Instances(#[source] AwsError),

    /// Launch configuration listing failed; the candidate set is discarded
    #[error("describing launch configurations: {0}")]
    LaunchConfigurations(#[source] AwsError),

    /// The image has no creation date, so its age is unknown
    #[error("image {image_id} has no creation date")]
    MissingCreationDate { image_id: String },

    /// The image's creation date did not parse
    #[error("image {image_id} has unparseable creation date '{value}': {source}")]
    InvalidCreationDate {
        image_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The region's worker task panicked or was cancelled
    #[error("region worker failed: {0}")]
    WorkerFailed(#[source] tokio::task::JoinError),

    /// Deregistration call failed for one image
    #[error("deregistering {image_id}: {source}")]
    Deregister {
        image_id: String,
        #[source]
        source: AwsError,
    },
}

/// Errors that abort the whole run before any region is processed
#[derive(Debug, Error)]
pub enum FatalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("listing regions: {0}")]
    Regions(#[source] AwsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let source = "abc".parse::<u32>().unwrap_err();
        let err = ConfigError::InvalidMaxAge {
            source_name: "CLEMY_MAX_AGE".to_string(),
            value: "abc".to_string(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "CLEMY_MAX_AGE must be a non-negative integer number of days, got 'abc'"
        );

        let err = SweepError::Deregister {
            image_id: "ami-1".to_string(),
            source: AwsError::Throttled {
                message: "slow down".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "deregistering ami-1: rate limit exceeded: slow down"
        );
    }

    #[test]
    fn test_fatal_wraps_config_transparently() {
        let source = "-1".parse::<u32>().unwrap_err();
        let fatal: FatalError = ConfigError::InvalidMaxAge {
            source_name: "--max-age-days".to_string(),
            value: "-1".to_string(),
            source,
        }
        .into();
        assert!(fatal.to_string().starts_with("--max-age-days must be"));
    }
}
