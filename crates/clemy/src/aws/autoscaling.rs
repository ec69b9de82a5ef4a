//! Auto Scaling launch configuration listing

use super::AwsAmiClient;
use super::error::AwsError;
use clemy_common::LaunchConfigurationRef;
use tracing::debug;

impl AwsAmiClient {
    /// List every launch configuration in `region`
    pub async fn list_launch_configurations(
        &self,
        region: &str,
    ) -> Result<Vec<LaunchConfigurationRef>, AwsError> {
        let client = self.ctx.autoscaling_client_in(region);
        let mut configs = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = client
                .describe_launch_configurations()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| AwsError::from_sdk(&e))?;

            configs.extend(response.launch_configurations().iter().map(|lc| {
                LaunchConfigurationRef {
                    name: lc.launch_configuration_name().to_string(),
                    image_id: Some(lc.image_id())
                        .filter(|id| !id.is_empty())
                        .map(str::to_string),
                }
            }));

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(
            region = %region,
            count = configs.len(),
            "Found launch configurations"
        );
        Ok(configs)
    }
}
