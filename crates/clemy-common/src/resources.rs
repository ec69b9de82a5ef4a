//! Read-only snapshots of provider resources
//!
//! Each sweep of a region fetches these once and drops them when the region's
//! report has been produced.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A machine image owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Image identifier, unique per account and region (`ami-...`)
    pub image_id: String,
    /// Human-readable image name, if set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw ISO-8601 creation timestamp as reported by the provider
    pub creation_date: Option<String>,
    /// Owning account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Image {
    pub fn new(image_id: impl Into<String>, creation_date: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            name: None,
            creation_date: Some(creation_date.into()),
            owner_id: None,
        }
    }
}

/// An instance together with the image it was launched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    pub instance_id: String,
    pub image_id: Option<String>,
}

impl InstanceRef {
    pub fn new(instance_id: impl Into<String>, image_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            image_id: Some(image_id.into()),
        }
    }
}

/// A launch configuration and the image it specifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfigurationRef {
    pub name: String,
    pub image_id: Option<String>,
}

impl LaunchConfigurationRef {
    pub fn new(name: impl Into<String>, image_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_id: Some(image_id.into()),
        }
    }
}

/// Parse a provider creation timestamp (RFC 3339, fractional seconds allowed).
pub fn parse_creation_date(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}
