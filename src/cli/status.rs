use std::sync::Arc;

use crate::cli::commands::StatusArgs;
use crate::config::ConfigSource;
use crate::errors::GateError;
use crate::pipeline::poller::{poll_until, scan_state};
use crate::tenable::{RemoteId, ScanApi, TenableClient};
use serde_json::json;
use tracing::info;

pub async fn handle_status(args: StatusArgs, source: &ConfigSource) -> Result<i32, GateError> {
    let tenable = source.tenable()?;
    let polling = source.polling()?;
    let api: Arc<dyn ScanApi> = Arc::new(TenableClient::new(&tenable)?);
    let scan_id = RemoteId::new(args.scan_id.trim());
    info!(scan_id = %scan_id, follow = args.follow, "Querying scan status");

    let (status, polls) = if args.follow {
        let api = &api;
        let id = &scan_id;
        let outcome = poll_until(
            &format!("scan {}", scan_id),
            polling.scan,
            scan_state,
            |status| GateError::ScanTerminated { scan_id: id.to_string(), status },
            move || api.scan_status(id),
        )
        .await?;
        (outcome.status, outcome.polls)
    } else {
        (api.scan_status(&scan_id).await?, 1)
    };

    if args.json {
        let body = json!({ "scan_id": scan_id, "status": status, "polls": polls });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("Scan {}: {}", scan_id, if status.is_empty() { "unknown" } else { status.as_str() });
    }

    Ok(crate::errors::EXIT_PASS)
}
