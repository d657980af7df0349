use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://cloud.tenable.com";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_KEY_PREFIX: &str = "tenable-reports";
pub const DEFAULT_HIGH_THRESHOLD: u64 = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SCAN_POLL_SECS: u64 = 10;
pub const DEFAULT_EXPORT_POLL_SECS: u64 = 3;

/// Fully resolved configuration for one driver run. Built once at startup
/// and passed down explicitly; nothing reads the environment after this.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub tenable: TenableConfig,
    pub scan: ScanConfig,
    pub polling: PollingConfig,
    pub storage: StorageConfig,
    pub gate: GateConfig,
}

#[derive(Clone)]
pub struct TenableConfig {
    pub base_url: String,
    pub access_key: String,
    pub secret_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for TenableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenableConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub name: String,
    /// Free-text target, normally the hostname the agent is linked under.
    pub target: String,
    pub folder_id: Option<i64>,
    pub export_format: ExportFormat,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub key_prefix: String,
}

#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// The run fails once the high-severity count reaches this value.
    pub high_threshold: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { high_threshold: DEFAULT_HIGH_THRESHOLD }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollingConfig {
    pub scan: PollPolicy,
    pub export: PollPolicy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            scan: PollPolicy::every(Duration::from_secs(DEFAULT_SCAN_POLL_SECS)),
            export: PollPolicy::every(Duration::from_secs(DEFAULT_EXPORT_POLL_SECS)),
        }
    }
}

/// How a remote status is polled: fixed interval, optional upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` waits forever.
    pub max_wait: Option<Duration>,
}

impl PollPolicy {
    pub fn every(interval: Duration) -> Self {
        Self { interval, max_wait: None }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Nessus,
    Html,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Nessus => "nessus",
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }

    /// File extension used for the uploaded object key.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "nessus" => Ok(Self::Nessus),
            "html" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unsupported export format '{}'", other)),
        }
    }
}

/// Optional YAML configuration file. Every field can also be supplied by
/// its environment variable, which takes precedence.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub tenable: TenableSection,
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub polling: PollingSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub gate: GateSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TenableSection {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    pub name: Option<String>,
    pub target: Option<String>,
    pub folder_id: Option<i64>,
    pub export_format: Option<ExportFormat>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PollingSection {
    pub scan_interval_secs: Option<u64>,
    pub export_interval_secs: Option<u64>,
    pub scan_max_wait_secs: Option<u64>,
    pub export_max_wait_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub key_prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GateSection {
    pub high_threshold: Option<u64>,
}
