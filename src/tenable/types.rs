use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::config::ExportFormat;
use crate::models::finding::Severity;

/// Opaque identifier issued by the vendor. The API returns scan and file
/// ids as JSON numbers today; strings are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteId(String);

impl RemoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(RemoteId(n.to_string())),
            Raw::Str(s) if !s.trim().is_empty() => Ok(RemoteId(s)),
            Raw::Str(_) => Err(serde::de::Error::custom("empty identifier")),
        }
    }
}

impl Serialize for RemoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Body of `POST /scans`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateScanRequest {
    pub settings: ScanSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSettings {
    pub name: String,
    pub text_targets: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
}

impl CreateScanRequest {
    pub fn new(name: &str, target: &str, folder_id: Option<i64>) -> Self {
        Self {
            settings: ScanSettings {
                name: name.to_string(),
                text_targets: target.to_string(),
                folder_id,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateScanResponse {
    #[serde(default)]
    pub id: Option<RemoteId>,
    #[serde(default)]
    pub scan: Option<ScanRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanRef {
    #[serde(default)]
    pub id: Option<RemoteId>,
}

impl CreateScanResponse {
    /// The new scan's id, from either the top level or the nested `scan` object.
    pub fn scan_id(self) -> Option<RemoteId> {
        self.id.or_else(|| self.scan.and_then(|s| s.id))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchResponse {
    #[serde(default)]
    pub scan_uuid: Option<String>,
}

/// Subset of `GET /scans/{id}` the driver reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanDetails {
    #[serde(default)]
    pub info: Option<ScanInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanInfo {
    #[serde(default)]
    pub status: Option<String>,
}

impl ScanDetails {
    pub fn status(&self) -> &str {
        self.info.as_ref().and_then(|i| i.status.as_deref()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportResponse {
    pub file: RemoteId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportStatus {
    #[serde(default)]
    pub status: Option<String>,
}

impl ExportStatus {
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// `GET /scans/{id}/hosts`: per-host vulnerability records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostsResponse {
    #[serde(default)]
    pub hosts: Option<Vec<HostRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostRecord {
    #[serde(default)]
    pub vulnerabilities: Option<Vec<VulnerabilityRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VulnerabilityRecord {
    #[serde(default)]
    pub severity: Option<serde_json::Value>,
}

impl VulnerabilityRecord {
    /// Numeric severity tier, if the record carries one.
    pub fn severity_level(&self) -> Option<i64> {
        match self.severity.as_ref()? {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            _ => None,
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity_level().and_then(Severity::from_level)
    }
}

impl HostsResponse {
    pub fn hosts(&self) -> &[HostRecord] {
        self.hosts.as_deref().unwrap_or(&[])
    }

    pub fn vulnerabilities(&self) -> impl Iterator<Item = &VulnerabilityRecord> {
        self.hosts()
            .iter()
            .flat_map(|h| h.vulnerabilities.as_deref().unwrap_or(&[]))
    }

    /// Number of vulnerability entries at exactly `severity`, across all hosts.
    pub fn count_at(&self, severity: Severity) -> u64 {
        self.vulnerabilities()
            .filter(|v| v.severity() == Some(severity))
            .count() as u64
    }
}
