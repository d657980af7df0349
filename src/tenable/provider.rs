use async_trait::async_trait;
use crate::config::ExportFormat;
use crate::errors::GateError;
use super::types::{CreateScanRequest, HostsResponse, LaunchResponse, RemoteId};

/// The vendor scan API as the driver sees it. Every call is a single
/// request; any non-success response comes back as an error.
#[async_trait]
pub trait ScanApi: Send + Sync {
    /// `POST /scans`, returning the new scan id.
    async fn create_scan(&self, request: &CreateScanRequest) -> Result<RemoteId, GateError>;

    /// `POST /scans/{id}/launch`
    async fn launch_scan(&self, scan_id: &RemoteId) -> Result<LaunchResponse, GateError>;

    /// `GET /scans/{id}`, returning `info.status` verbatim (empty if absent).
    async fn scan_status(&self, scan_id: &RemoteId) -> Result<String, GateError>;

    /// `POST /scans/{id}/export`, returning the export file id.
    async fn request_export(&self, scan_id: &RemoteId, format: ExportFormat) -> Result<RemoteId, GateError>;

    /// `GET /scans/{id}/export/{file}`
    async fn export_status(&self, scan_id: &RemoteId, file_id: &RemoteId) -> Result<String, GateError>;

    /// `GET /scans/{id}/export/{file}/download`, raw report bytes.
    async fn download_export(&self, scan_id: &RemoteId, file_id: &RemoteId) -> Result<Vec<u8>, GateError>;

    /// `GET /scans/{id}/hosts`
    async fn scan_hosts(&self, scan_id: &RemoteId) -> Result<HostsResponse, GateError>;

    /// Base URL for logging
    fn endpoint(&self) -> &str;
}
