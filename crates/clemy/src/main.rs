//! clemy: deregister stale, unused AMIs across every EC2 region
//!
//! Configuration comes from `CLEMY_*` environment variables, overridable on
//! the command line. Reports go to stdout, logs to stderr.

use clap::Parser;
use clemy::aws::{AwsAmiClient, AwsContext};
use clemy::{Config, OutputFormat, Overrides};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "clemy")]
#[command(about = "Deregister old AMIs not used by any instance or launch configuration")]
#[command(version)]
struct Args {
    /// Report what would be deregistered without deregistering (env: CLEMY_DRY_RUN)
    #[arg(long)]
    dry_run: bool,

    /// Print per-region completion lines and debug logs (env: CLEMY_VERBOSE)
    #[arg(short, long)]
    verbose: bool,

    /// Minimum image age in days (env: CLEMY_MAX_AGE, default 14)
    #[arg(long, value_name = "DAYS")]
    max_age_days: Option<String>,

    /// Ignore terminated and shutting-down instances when checking image use
    /// (env: CLEMY_LIVE_INSTANCES_ONLY)
    #[arg(long)]
    live_instances_only: bool,

    /// Only sweep these regions (repeatable or comma-separated)
    #[arg(long = "region", value_delimiter = ',')]
    regions: Vec<String>,

    /// Region used to discover the enabled regions
    #[arg(long)]
    home_region: Option<String>,

    /// AWS profile to use (overrides AWS_PROFILE env var)
    #[arg(long)]
    profile: Option<String>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            dry_run: self.dry_run,
            verbose: self.verbose,
            max_age_days: self.max_age_days.clone(),
            live_instances_only: self.live_instances_only,
            regions: self
                .regions
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            format: self.format,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::from_env().and_then(|c| c.with_overrides(&args.overrides())) {
        Ok(config) => config,
        Err(e) => return fatal(e.into()),
    };

    init_tracing(config.verbose);

    let ctx = AwsContext::new(args.home_region.as_deref(), args.profile.as_deref()).await;
    if let Some(profile) = &args.profile {
        info!(profile = %profile, "Using AWS profile");
    }
    info!(home_region = %ctx.home_region(), "Loaded AWS configuration");

    let api = Arc::new(AwsAmiClient::from_context(&ctx));
    match clemy::run(&config, api, std::io::stdout()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fatal(e.into()),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let mut filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    // Keep the SDK quiet unless something goes wrong
    for directive in ["aws_config=warn", "aws_smithy_runtime=warn", "aws_sdk_ec2=warn", "aws_sdk_autoscaling=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print a fatal error with its causes and return the failure exit code
fn fatal(e: anyhow::Error) -> ExitCode {
    eprintln!("Fatal: {e}");
    for cause in e.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
    ExitCode::from(1)
}
