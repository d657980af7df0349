use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::errors::GateError;
use super::credentials::resolve_credential;
use super::types::*;

/// Environment variable names, shared by the loader and error messages.
pub mod vars {
    pub const TENABLE_ACCESS_KEY: &str = "TENABLE_ACCESS_KEY";
    pub const TENABLE_SECRET_KEY: &str = "TENABLE_SECRET_KEY";
    pub const TENABLE_API_BASE: &str = "TENABLE_API_BASE";
    pub const TENABLE_HTTP_TIMEOUT_SECS: &str = "TENABLE_HTTP_TIMEOUT_SECS";
    pub const TARGET_AGENT_NAME: &str = "TARGET_AGENT_NAME";
    pub const SCAN_NAME: &str = "SCAN_NAME";
    pub const SCAN_FOLDER_ID: &str = "SCAN_FOLDER_ID";
    pub const EXPORT_FORMAT: &str = "EXPORT_FORMAT";
    pub const SCAN_POLL_INTERVAL_SECS: &str = "SCAN_POLL_INTERVAL_SECS";
    pub const EXPORT_POLL_INTERVAL_SECS: &str = "EXPORT_POLL_INTERVAL_SECS";
    pub const SCAN_MAX_WAIT_SECS: &str = "SCAN_MAX_WAIT_SECS";
    pub const EXPORT_MAX_WAIT_SECS: &str = "EXPORT_MAX_WAIT_SECS";
    pub const S3_BUCKET: &str = "S3_BUCKET";
    pub const AWS_REGION: &str = "AWS_REGION";
    pub const S3_ENDPOINT_URL: &str = "S3_ENDPOINT_URL";
    pub const REPORT_KEY_PREFIX: &str = "REPORT_KEY_PREFIX";
    pub const VULN_FAIL_THRESHOLD_HIGH: &str = "VULN_FAIL_THRESHOLD_HIGH";
}

use vars::*;

/// Required to talk to the vendor API at all.
pub const TENABLE_REQUIRED: &[&str] = &[TENABLE_ACCESS_KEY, TENABLE_SECRET_KEY];

/// Required for a full scan run.
pub const RUN_REQUIRED: &[&str] = &[TENABLE_ACCESS_KEY, TENABLE_SECRET_KEY, S3_BUCKET, TARGET_AGENT_NAME];

const MAX_CONFIG_BYTES: u64 = 1_048_576;

/// Read and parse an optional YAML config file.
pub async fn parse_config_file(path: &Path) -> Result<FileConfig, GateError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GateError::config(format!("Config file not found: {}", path.display())));
        }
        Err(e) => return Err(e.into()),
    };
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(GateError::config("Config file exceeds 1MB limit"));
    }

    let content = tokio::fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Layered configuration lookup: environment first, then the config file,
/// then built-in defaults. Empty values count as unset.
#[derive(Clone, Default)]
pub struct ConfigSource {
    file: FileConfig,
    env: HashMap<String, String>,
}

impl ConfigSource {
    pub fn new(file: FileConfig, env: HashMap<String, String>) -> Self {
        Self { file, env }
    }

    /// Snapshot the process environment.
    pub fn from_env(file: FileConfig) -> Self {
        Self::new(file, std::env::vars().collect())
    }

    /// Load the optional config file and snapshot the environment.
    pub async fn load(config_path: Option<&Path>) -> Result<Self, GateError> {
        let file = match config_path {
            Some(path) => parse_config_file(path).await?,
            None => FileConfig::default(),
        };
        Ok(Self::from_env(file))
    }

    fn file_value(&self, var: &str) -> Option<String> {
        let f = &self.file;
        let value = match var {
            TENABLE_ACCESS_KEY => f.tenable.access_key.clone(),
            TENABLE_SECRET_KEY => f.tenable.secret_key.clone(),
            TENABLE_API_BASE => f.tenable.api_base.clone(),
            TENABLE_HTTP_TIMEOUT_SECS => f.tenable.timeout_secs.map(|v| v.to_string()),
            TARGET_AGENT_NAME => f.scan.target.clone(),
            SCAN_NAME => f.scan.name.clone(),
            SCAN_FOLDER_ID => f.scan.folder_id.map(|v| v.to_string()),
            EXPORT_FORMAT => f.scan.export_format.map(|v| v.to_string()),
            SCAN_POLL_INTERVAL_SECS => f.polling.scan_interval_secs.map(|v| v.to_string()),
            EXPORT_POLL_INTERVAL_SECS => f.polling.export_interval_secs.map(|v| v.to_string()),
            SCAN_MAX_WAIT_SECS => f.polling.scan_max_wait_secs.map(|v| v.to_string()),
            EXPORT_MAX_WAIT_SECS => f.polling.export_max_wait_secs.map(|v| v.to_string()),
            S3_BUCKET => f.storage.bucket.clone(),
            AWS_REGION => f.storage.region.clone(),
            S3_ENDPOINT_URL => f.storage.endpoint_url.clone(),
            REPORT_KEY_PREFIX => f.storage.key_prefix.clone(),
            VULN_FAIL_THRESHOLD_HIGH => f.gate.high_threshold.map(|v| v.to_string()),
            _ => None,
        };
        value.and_then(|v| resolve_credential(&v, &self.env))
    }

    /// Look up a value by its environment variable name.
    pub fn get(&self, var: &str) -> Option<String> {
        self.env
            .get(var)
            .cloned()
            .or_else(|| self.file_value(var))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Fail with one message naming every unset variable in `names`.
    pub fn require(&self, names: &[&str]) -> Result<(), GateError> {
        let missing: Vec<&str> = names.iter().copied().filter(|n| self.get(n).is_none()).collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(GateError::config(format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        )))
    }

    fn required(&self, var: &str) -> Result<String, GateError> {
        self.get(var)
            .ok_or_else(|| GateError::config(format!("Missing required environment variable: {}", var)))
    }

    fn parse<T: std::str::FromStr>(&self, var: &str) -> Result<Option<T>, GateError>
    where
        T::Err: std::fmt::Display,
    {
        match self.get(var) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| GateError::config(format!("Invalid value for {}: '{}' ({})", var, raw, e))),
        }
    }

    fn secs(&self, var: &str) -> Result<Option<Duration>, GateError> {
        Ok(self.parse::<u64>(var)?.map(Duration::from_secs))
    }

    /// Poll intervals must be at least one second.
    fn interval(&self, var: &str, default_secs: u64) -> Result<Duration, GateError> {
        match self.parse::<u64>(var)? {
            Some(0) => Err(GateError::config(format!("Invalid value for {}: must be at least 1", var))),
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => Ok(Duration::from_secs(default_secs)),
        }
    }

    pub fn tenable(&self) -> Result<TenableConfig, GateError> {
        self.require(TENABLE_REQUIRED)?;
        let timeout = self
            .secs(TENABLE_HTTP_TIMEOUT_SECS)?
            .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
        let base_url = self
            .get(TENABLE_API_BASE)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(TenableConfig {
            base_url,
            access_key: self.required(TENABLE_ACCESS_KEY)?,
            secret_key: self.required(TENABLE_SECRET_KEY)?,
            timeout,
        })
    }

    pub fn scan(&self) -> Result<ScanConfig, GateError> {
        let export_format = match self.get(EXPORT_FORMAT) {
            Some(raw) => raw
                .parse::<ExportFormat>()
                .map_err(|e| GateError::config(format!("Invalid value for {}: {}", EXPORT_FORMAT, e)))?,
            None => ExportFormat::default(),
        };

        Ok(ScanConfig {
            name: self
                .get(SCAN_NAME)
                .unwrap_or_else(|| format!("AMI-Agent-Scan-{}", chrono::Utc::now().timestamp())),
            target: self.required(TARGET_AGENT_NAME)?,
            folder_id: self.parse::<i64>(SCAN_FOLDER_ID)?,
            export_format,
        })
    }

    pub fn polling(&self) -> Result<PollingConfig, GateError> {
        let scan_interval = self.interval(SCAN_POLL_INTERVAL_SECS, DEFAULT_SCAN_POLL_SECS)?;
        let export_interval = self.interval(EXPORT_POLL_INTERVAL_SECS, DEFAULT_EXPORT_POLL_SECS)?;

        Ok(PollingConfig {
            scan: PollPolicy { interval: scan_interval, max_wait: self.secs(SCAN_MAX_WAIT_SECS)? },
            export: PollPolicy { interval: export_interval, max_wait: self.secs(EXPORT_MAX_WAIT_SECS)? },
        })
    }

    pub fn storage(&self) -> Result<StorageConfig, GateError> {
        Ok(StorageConfig {
            bucket: self.required(S3_BUCKET)?,
            region: self.get(AWS_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: self.get(S3_ENDPOINT_URL),
            key_prefix: self
                .get(REPORT_KEY_PREFIX)
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
        })
    }

    pub fn gate(&self) -> Result<GateConfig, GateError> {
        Ok(GateConfig {
            high_threshold: self
                .parse::<u64>(VULN_FAIL_THRESHOLD_HIGH)?
                .unwrap_or(DEFAULT_HIGH_THRESHOLD),
        })
    }

    /// Everything a full run needs. All missing required variables are
    /// reported together before any value is parsed.
    pub fn driver(&self) -> Result<DriverConfig, GateError> {
        self.require(RUN_REQUIRED)?;
        Ok(DriverConfig {
            tenable: self.tenable()?,
            scan: self.scan()?,
            polling: self.polling()?,
            storage: self.storage()?,
            gate: self.gate()?,
        })
    }
}
