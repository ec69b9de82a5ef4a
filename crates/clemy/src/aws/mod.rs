//! AWS client modules
//!
//! This module wraps the SDK clients a sweep needs:
//! - EC2: region discovery, owned images, instances, deregistration
//! - Auto Scaling: launch configurations, per region
//!
//! Everything above this layer talks to the provider through
//! [`AmiOperations`] so it can run against a mock.

pub mod autoscaling;
pub mod context;
pub mod ec2;
pub mod error;
pub mod operations;

pub use context::AwsContext;
pub use error::{AwsError, classify_aws_error};
pub use operations::{AmiOperations, InstanceScope};

#[cfg(test)]
pub use operations::MockAmiOperations;

use async_trait::async_trait;
use clemy_common::{Image, InstanceRef, LaunchConfigurationRef};

/// SDK-backed implementation of [`AmiOperations`]
#[derive(Debug, Clone)]
pub struct AwsAmiClient {
    pub(crate) ctx: AwsContext,
}

impl AwsAmiClient {
    /// Create a client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self { ctx: ctx.clone() }
    }
}

#[async_trait]
impl AmiOperations for AwsAmiClient {
    async fn describe_regions(&self) -> Result<Vec<String>, AwsError> {
        self.list_regions().await
    }

    async fn describe_owned_images(&self, region: &str) -> Result<Vec<Image>, AwsError> {
        self.list_owned_images(region).await
    }

    async fn describe_instances(
        &self,
        region: &str,
        scope: InstanceScope,
    ) -> Result<Vec<InstanceRef>, AwsError> {
        self.list_instances(region, scope).await
    }

    async fn describe_launch_configurations(
        &self,
        region: &str,
    ) -> Result<Vec<LaunchConfigurationRef>, AwsError> {
        self.list_launch_configurations(region).await
    }

    async fn deregister_image(&self, region: &str, image_id: &str) -> Result<(), AwsError> {
        self.deregister(region, image_id).await
    }
}
