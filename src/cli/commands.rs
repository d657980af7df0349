use clap::{Args, Parser, Subcommand};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "agent-scan-gate",
    version = VERSION,
    about = "Run a Tenable agent scan, archive the report to S3 and gate on high severity findings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file; environment variables take precedence
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, launch and export a scan, upload the report and apply the gate
    Run(RunArgs),
    /// Show the status of an existing scan
    Status(StatusArgs),
    /// Apply the gate to an existing, completed scan
    Gate(GateArgs),
    /// Resolve configuration without contacting any service
    Validate,
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct StatusArgs {
    /// Scan ID to query
    pub scan_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep polling until the scan completes or stops
    #[arg(long)]
    pub follow: bool,
}

#[derive(Args, Clone)]
pub struct GateArgs {
    /// Scan ID to evaluate
    pub scan_id: String,

    /// Override VULN_FAIL_THRESHOLD_HIGH
    #[arg(long)]
    pub threshold: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
