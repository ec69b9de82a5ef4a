//! EC2 calls: regions, owned images, instances, deregistration

use super::AwsAmiClient;
use super::error::AwsError;
use super::operations::InstanceScope;
use aws_sdk_ec2::types::Filter;
use clemy_common::defaults::LIVE_INSTANCE_STATES;
use clemy_common::{Image, InstanceRef};
use tracing::debug;

impl AwsAmiClient {
    /// List enabled regions via the home-region client
    pub async fn list_regions(&self) -> Result<Vec<String>, AwsError> {
        let response = self
            .ctx
            .ec2_client()
            .describe_regions()
            .send()
            .await
            .map_err(|e| AwsError::from_sdk(&e))?;

        let regions: Vec<String> = response
            .regions()
            .iter()
            .filter_map(|r| r.region_name())
            .map(str::to_string)
            .collect();

        debug!(count = regions.len(), "Discovered regions");
        Ok(regions)
    }

    /// List all images owned by this account in `region`
    pub async fn list_owned_images(&self, region: &str) -> Result<Vec<Image>, AwsError> {
        let client = self.ctx.ec2_client_in(region);
        let mut images = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = client
                .describe_images()
                .owners("self")
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| AwsError::from_sdk(&e))?;

            images.extend(response.images().iter().filter_map(|image| {
                Some(Image {
                    image_id: image.image_id()?.to_string(),
                    name: image.name().map(str::to_string),
                    creation_date: image.creation_date().map(str::to_string),
                    owner_id: image.owner_id().map(str::to_string),
                })
            }));

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(region = %region, count = images.len(), "Found owned images");
        Ok(images)
    }

    /// List all instances in `region`, following every page
    pub async fn list_instances(
        &self,
        region: &str,
        scope: InstanceScope,
    ) -> Result<Vec<InstanceRef>, AwsError> {
        let client = self.ctx.ec2_client_in(region);

        let filters = match scope {
            InstanceScope::All => None,
            InstanceScope::Live => Some(vec![
                Filter::builder()
                    .name("instance-state-name")
                    .set_values(Some(
                        LIVE_INSTANCE_STATES.iter().map(|s| s.to_string()).collect(),
                    ))
                    .build(),
            ]),
        };

        let mut instances = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let response = client
                .describe_instances()
                .set_filters(filters.clone())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| AwsError::from_sdk(&e))?;
            pages += 1;

            for reservation in response.reservations() {
                for instance in reservation.instances() {
                    if let Some(instance_id) = instance.instance_id() {
                        instances.push(InstanceRef {
                            instance_id: instance_id.to_string(),
                            image_id: instance.image_id().map(str::to_string),
                        });
                    }
                }
            }

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(region = %region, pages, count = instances.len(), ?scope, "Found instances");
        Ok(instances)
    }

    /// Deregister `image_id` in `region`
    pub async fn deregister(&self, region: &str, image_id: &str) -> Result<(), AwsError> {
        self.ctx
            .ec2_client_in(region)
            .deregister_image()
            .image_id(image_id)
            .send()
            .await
            .map_err(|e| AwsError::from_sdk(&e))?;
        Ok(())
    }
}
