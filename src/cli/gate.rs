use crate::cli::commands::GateArgs;
use crate::config::ConfigSource;
use crate::errors::GateError;
use crate::gate::GateReport;
use crate::pipeline::count_high_findings;
use crate::tenable::{RemoteId, TenableClient};
use serde_json::json;

pub async fn handle_gate(args: GateArgs, source: &ConfigSource) -> Result<i32, GateError> {
    let tenable = source.tenable()?;
    let mut gate = source.gate()?;
    if let Some(threshold) = args.threshold {
        gate.high_threshold = threshold;
    }

    let client = TenableClient::new(&tenable)?;
    let scan_id = RemoteId::new(args.scan_id.trim());
    let high_count = count_high_findings(&client, &scan_id).await?;
    let report = GateReport::evaluate(high_count, &gate);

    if args.json {
        let body = json!({ "scan_id": scan_id, "gate": report });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("High severity vulns: {}", report.high_count);
        println!("{}", report.message());
    }

    Ok(report.exit_code())
}
