use agent_scan_gate::{cli, config, errors};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so `--json` output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: cli::Cli) -> Result<i32, errors::GateError> {
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let source = config::ConfigSource::load(config_path.as_deref()).await?;

    match cli.command {
        cli::Commands::Run(args) => cli::run::handle_run(args, &source).await,
        cli::Commands::Status(args) => cli::status::handle_status(args, &source).await,
        cli::Commands::Gate(args) => cli::gate::handle_gate(args, &source).await,
        cli::Commands::Validate => cli::validate::handle_validate(&source),
    }
}
