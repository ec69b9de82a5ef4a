//! clemy-common - Shared types and defaults
//!
//! Provider-independent snapshots of the resources a sweep looks at, kept free
//! of AWS SDK dependencies so the filtering logic can be exercised on plain data.
//!
//! ## Modules
//!
//! - [`defaults`]: Default configuration values and environment variable names
//! - [`resources`]: Image, instance and launch configuration snapshots

pub mod defaults;
pub mod resources;

pub use resources::{Image, InstanceRef, LaunchConfigurationRef, parse_creation_date};
