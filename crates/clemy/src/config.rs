//! Configuration for a sweep
//!
//! Built once at startup from the environment plus CLI overrides, then passed
//! by reference to every region worker and never mutated.

use crate::aws::InstanceScope;
use crate::error::ConfigError;
use clemy_common::defaults::{
    DEFAULT_MAX_AGE_DAYS, ENV_DRY_RUN, ENV_LIVE_INSTANCES_ONLY, ENV_MAX_AGE, ENV_VERBOSE,
};

/// How reports are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable blocks separated by a divider line
    #[default]
    Text,
    /// One JSON object per region, one per line
    Json,
}

/// Sweep configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Report candidates without deregistering them
    pub dry_run: bool,
    /// Print per-region completion lines and debug logs
    pub verbose: bool,
    /// Minimum image age in days
    pub max_age_days: u32,
    /// Which instances count as using an image
    pub instance_scope: InstanceScope,
    /// Restrict the sweep to these regions (empty = every discovered region)
    pub regions: Vec<String>,
    /// Report format
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            verbose: false,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            instance_scope: InstanceScope::All,
            regions: Vec::new(),
            format: OutputFormat::Text,
        }
    }
}

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dry_run: bool,
    pub verbose: bool,
    pub max_age_days: Option<String>,
    pub live_instances_only: bool,
    pub regions: Vec<String>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
        })
    }

    /// Load configuration through `lookup`.
    ///
    /// Toggles are enabled by the variable being present, whatever its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_age_days = match lookup(ENV_MAX_AGE) {
            Some(value) => parse_max_age(ENV_MAX_AGE, &value)?,
            None => DEFAULT_MAX_AGE_DAYS,
        };

        let instance_scope = if lookup(ENV_LIVE_INSTANCES_ONLY).is_some() {
            InstanceScope::Live
        } else {
            InstanceScope::All
        };

        Ok(Self {
            dry_run: lookup(ENV_DRY_RUN).is_some(),
            verbose: lookup(ENV_VERBOSE).is_some(),
            max_age_days,
            instance_scope,
            ..Default::default()
        })
    }

    /// Layer CLI overrides on top of this configuration
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self, ConfigError> {
        self.dry_run |= overrides.dry_run;
        self.verbose |= overrides.verbose;
        if let Some(value) = &overrides.max_age_days {
            self.max_age_days = parse_max_age("--max-age-days", value)?;
        }
        if overrides.live_instances_only {
            self.instance_scope = InstanceScope::Live;
        }
        if !overrides.regions.is_empty() {
            self.regions = overrides.regions.clone();
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        Ok(self)
    }

    /// Minimum age an image must reach before it may be removed
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.max_age_days))
    }

    /// Whether `region` is part of this sweep
    pub fn includes_region(&self, region: &str) -> bool {
        self.regions.is_empty() || self.regions.iter().any(|r| r == region)
    }
}

fn parse_max_age(source_name: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|source| ConfigError::InvalidMaxAge {
            source_name: source_name.to_string(),
            value: value.to_string(),
            source,
        })
}
