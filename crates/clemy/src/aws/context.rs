//! Shared AWS configuration context
//!
//! Loads the SDK configuration once and derives per-region service clients
//! from it, so every region worker shares credentials and the HTTP client.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use clemy_common::defaults::DEFAULT_HOME_REGION;
use std::sync::Arc;

/// Shared AWS configuration context for creating service clients.
///
/// The home region is the one used for region discovery; clients for the
/// swept regions are built on demand with [`AwsContext::ec2_client_in`] and
/// [`AwsContext::autoscaling_client_in`].
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
    home_region: String,
}

impl AwsContext {
    /// Load AWS configuration from the environment, shared config files and
    /// instance roles.
    ///
    /// `home_region` overrides the SDK's region resolution; when neither is
    /// available, [`DEFAULT_HOME_REGION`] is used. `profile` selects a named
    /// profile from the shared config files.
    pub async fn new(home_region: Option<&str>, profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = home_region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = loader.load().await;

        let config = if config.region().is_none() {
            config
                .into_builder()
                .region(Region::new(DEFAULT_HOME_REGION))
                .build()
        } else {
            config
        };

        let home_region = config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| DEFAULT_HOME_REGION.to_string());

        Self {
            config: Arc::new(config),
            home_region,
        }
    }

    /// Get the underlying SDK config.
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// Region used for discovery and launch configurations.
    pub fn home_region(&self) -> &str {
        &self.home_region
    }

    /// Create an EC2 client for the home region.
    pub fn ec2_client(&self) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(self.sdk_config())
    }

    /// Create an EC2 client scoped to `region`.
    pub fn ec2_client_in(&self, region: &str) -> aws_sdk_ec2::Client {
        let conf = aws_sdk_ec2::config::Builder::from(self.sdk_config())
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_ec2::Client::from_conf(conf)
    }

    /// Create an Auto Scaling client scoped to `region`.
    pub fn autoscaling_client_in(&self, region: &str) -> aws_sdk_autoscaling::Client {
        let conf = aws_sdk_autoscaling::config::Builder::from(self.sdk_config())
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_autoscaling::Client::from_conf(conf)
    }
}

impl std::fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsContext")
            .field("home_region", &self.home_region)
            .finish_non_exhaustive()
    }
}
