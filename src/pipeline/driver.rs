use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use crate::config::DriverConfig;
use crate::errors::GateError;
use crate::gate::GateReport;
use crate::models::Severity;
use crate::storage::{report_key, ReportStore};
use crate::tenable::{CreateScanRequest, RemoteId, ScanApi};
use super::poller::{export_state, poll_until, scan_state, PollOutcome};
use super::state::{ExportedReport, RunSummary, ScanPhase};
use tracing::{error, info};

/// Walks one scan through create, launch, completion, export, upload and
/// count. Strictly sequential; nothing is retried.
pub struct ScanDriver {
    api: Arc<dyn ScanApi>,
    store: Arc<dyn ReportStore>,
    config: DriverConfig,
}

impl ScanDriver {
    pub fn new(api: Arc<dyn ScanApi>, store: Arc<dyn ReportStore>, config: DriverConfig) -> Self {
        Self { api, store, config }
    }

    pub async fn create(&self) -> Result<RemoteId, GateError> {
        let scan = &self.config.scan;
        let request = CreateScanRequest::new(&scan.name, &scan.target, scan.folder_id);
        let scan_id = self.api.create_scan(&request).await?;
        info!(scan_id = %scan_id, name = %scan.name, target = %scan.target, "Created scan");
        Ok(scan_id)
    }

    pub async fn launch(&self, scan_id: &RemoteId) -> Result<(), GateError> {
        let launched = self.api.launch_scan(scan_id).await?;
        info!(scan_id = %scan_id, scan_uuid = ?launched.scan_uuid, "Launched scan");
        Ok(())
    }

    /// Poll the scan until it reports `completed`.
    pub async fn await_completion(&self, scan_id: &RemoteId) -> Result<PollOutcome, GateError> {
        let api = &self.api;
        let label = format!("scan {}", scan_id);
        let outcome = poll_until(
            &label,
            self.config.polling.scan,
            scan_state,
            |status| GateError::ScanTerminated { scan_id: scan_id.to_string(), status },
            move || api.scan_status(scan_id),
        )
        .await?;
        info!(scan_id = %scan_id, polls = outcome.polls, elapsed_secs = outcome.elapsed.as_secs(), "Scan completed");
        Ok(outcome)
    }

    /// Request an export, wait for it to be ready and download it.
    pub async fn export(&self, scan_id: &RemoteId) -> Result<ExportedReport, GateError> {
        let format = self.config.scan.export_format;
        let file_id = self.api.request_export(scan_id, format).await?;
        info!(scan_id = %scan_id, file_id = %file_id, format = %format, "Export requested");

        let api = &self.api;
        let file = &file_id;
        let label = format!("export {} of scan {}", file_id, scan_id);
        let outcome = poll_until(
            &label,
            self.config.polling.export,
            export_state,
            |status| GateError::ExportFailed {
                scan_id: scan_id.to_string(),
                file_id: file.to_string(),
                status,
            },
            move || api.export_status(scan_id, file),
        )
        .await?;

        let bytes = self.api.download_export(scan_id, &file_id).await?;
        info!(scan_id = %scan_id, file_id = %file_id, bytes = bytes.len(), "Downloaded report");
        Ok(ExportedReport { file_id, bytes, polls: outcome.polls })
    }

    /// Upload the report under `{prefix}/{scan_id}_{unix_time}.{ext}`.
    /// Returns the key and the store's location for it.
    pub async fn deliver(&self, scan_id: &RemoteId, bytes: Vec<u8>) -> Result<(String, String), GateError> {
        let key = report_key(
            &self.config.storage.key_prefix,
            scan_id,
            Utc::now().timestamp(),
            self.config.scan.export_format,
        );
        let location = self.store.put(&key, bytes).await?;
        Ok((key, location))
    }

    pub async fn count_findings(&self, scan_id: &RemoteId) -> Result<u64, GateError> {
        count_high_findings(self.api.as_ref(), scan_id).await
    }

    /// Run the whole lifecycle and evaluate the gate.
    pub async fn run(&self) -> Result<RunSummary, GateError> {
        let mut reached: Option<ScanPhase> = None;
        match self.run_phases(&mut reached).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                let last_phase = reached.map(|p| p.to_string()).unwrap_or_else(|| "none".to_string());
                error!(
                    last_phase = %last_phase,
                    error_type = e.classify().error_type,
                    error = %e,
                    "Scan run aborted"
                );
                Err(e)
            }
        }
    }

    async fn run_phases(&self, reached: &mut Option<ScanPhase>) -> Result<RunSummary, GateError> {
        let started_at = Utc::now();
        let start = Instant::now();
        info!(endpoint = self.api.endpoint(), store = self.store.store_name(), "Starting scan run");

        let scan_id = self.create().await?;
        *reached = Some(ScanPhase::Created);

        self.launch(&scan_id).await?;
        *reached = Some(ScanPhase::Launched);

        let completion = self.await_completion(&scan_id).await?;
        *reached = Some(ScanPhase::Completed);

        let report = self.export(&scan_id).await?;
        *reached = Some(ScanPhase::Exported);

        let report_bytes = report.bytes.len();
        let (report_key, report_location) = self.deliver(&scan_id, report.bytes).await?;
        *reached = Some(ScanPhase::Uploaded);

        let high_count = self.count_findings(&scan_id).await?;
        *reached = Some(ScanPhase::Counted);

        let gate = GateReport::evaluate(high_count, &self.config.gate);
        info!(
            scan_id = %scan_id,
            high_count,
            threshold = gate.threshold,
            verdict = ?gate.verdict,
            "Gate evaluated"
        );

        Ok(RunSummary {
            scan_id,
            scan_name: self.config.scan.name.clone(),
            target: self.config.scan.target.clone(),
            report_key,
            report_location,
            report_bytes,
            scan_polls: completion.polls,
            export_polls: report.polls,
            gate,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Count vulnerability entries at the top severity tier across all hosts.
/// Lower tiers never contribute.
pub async fn count_high_findings(api: &dyn ScanApi, scan_id: &RemoteId) -> Result<u64, GateError> {
    let hosts = api.scan_hosts(scan_id).await?;
    let count = hosts.count_at(Severity::GATED);
    info!(scan_id = %scan_id, hosts = hosts.hosts().len(), high_count = count, "Counted high severity vulnerabilities");
    Ok(count)
}
