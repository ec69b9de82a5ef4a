//! Provider operations trait for testing

use super::error::AwsError;
use async_trait::async_trait;
use clemy_common::{Image, InstanceRef, LaunchConfigurationRef};

/// Which instances count as "using" an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstanceScope {
    /// Every instance the provider still reports, terminated ones included
    #[default]
    All,
    /// Only pending, running, stopping and stopped instances
    Live,
}

/// The read and write calls a sweep makes against the provider.
///
/// Abstracted so the worker and orchestrator can be unit tested without
/// hitting real AWS. Every listing call exhausts pagination before returning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AmiOperations: Send + Sync {
    /// List the names of all regions enabled for the account
    async fn describe_regions(&self) -> Result<Vec<String>, AwsError>;

    /// List every image owned by the calling account in `region`
    async fn describe_owned_images(&self, region: &str) -> Result<Vec<Image>, AwsError>;

    /// List every instance in `region` within `scope`
    async fn describe_instances(
        &self,
        region: &str,
        scope: InstanceScope,
    ) -> Result<Vec<InstanceRef>, AwsError>;

    /// List every launch configuration in `region`
    async fn describe_launch_configurations(
        &self,
        region: &str,
    ) -> Result<Vec<LaunchConfigurationRef>, AwsError>;

    /// Deregister a single image in `region`
    async fn deregister_image(&self, region: &str, image_id: &str) -> Result<(), AwsError>;
}
