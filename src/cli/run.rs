use std::sync::Arc;

use crate::cli::commands::RunArgs;
use crate::config::ConfigSource;
use crate::errors::GateError;
use crate::pipeline::{RunSummary, ScanDriver};
use crate::storage::S3ReportStore;
use crate::tenable::TenableClient;
use tracing::info;

pub async fn handle_run(args: RunArgs, source: &ConfigSource) -> Result<i32, GateError> {
    // Resolve everything before the first request goes out
    let config = source.driver()?;
    info!(
        target_agent = %config.scan.target,
        scan_name = %config.scan.name,
        bucket = %config.storage.bucket,
        threshold = config.gate.high_threshold,
        "Configuration loaded"
    );

    let api = Arc::new(TenableClient::new(&config.tenable)?);
    let store = Arc::new(S3ReportStore::new(&config.storage).await);
    let driver = ScanDriver::new(api, store, config);

    let summary = driver.run().await?;
    print_summary(&summary, args.json)?;
    Ok(summary.exit_code())
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<(), GateError> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("Scan ID: {}", summary.scan_id);
    println!("Report: {} ({} bytes)", summary.report_location, summary.report_bytes);
    println!("High severity vulns: {}", summary.gate.high_count);
    println!("{}", summary.gate.message());
    Ok(())
}
