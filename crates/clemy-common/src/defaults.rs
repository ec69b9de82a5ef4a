//! Default configuration values
//!
//! These constants keep the binary, its tests and the docs in agreement.

/// Environment variable enabling dry-run mode (presence enables it)
pub const ENV_DRY_RUN: &str = "CLEMY_DRY_RUN";

/// Environment variable enabling verbose output (presence enables it)
pub const ENV_VERBOSE: &str = "CLEMY_VERBOSE";

/// Environment variable holding the minimum image age in days
pub const ENV_MAX_AGE: &str = "CLEMY_MAX_AGE";

/// Environment variable restricting the in-use check to live instances
pub const ENV_LIVE_INSTANCES_ONLY: &str = "CLEMY_LIVE_INSTANCES_ONLY";

/// Default minimum image age in days
pub const DEFAULT_MAX_AGE_DAYS: u32 = 14;

/// Region used for discovery when neither the CLI nor the SDK provides one
pub const DEFAULT_HOME_REGION: &str = "us-east-1";

/// Line printed between region reports
pub const REPORT_DIVIDER: &str = "=============================";

/// Instance states counted as "live" when terminated instances are ignored
pub const LIVE_INSTANCE_STATES: &[&str] = &["pending", "running", "stopping", "stopped"];
