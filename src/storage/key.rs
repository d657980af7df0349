use crate::config::ExportFormat;
use crate::tenable::RemoteId;

/// Object key for an uploaded report: `{prefix}/{scan_id}_{unix_time}.{ext}`.
pub fn report_key(prefix: &str, scan_id: &RemoteId, unix_time: i64, format: ExportFormat) -> String {
    let prefix = prefix.trim_matches('/');
    let file = format!("{}_{}.{}", scan_id, unix_time, format.extension());
    if prefix.is_empty() {
        file
    } else {
        format!("{}/{}", prefix, file)
    }
}
