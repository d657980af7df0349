use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("{operation} failed with HTTP {status}: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response from {operation}: {details}")]
    Decode {
        operation: &'static str,
        details: String,
    },

    #[error("Scan {scan_id} ended with status '{status}'")]
    ScanTerminated { scan_id: String, status: String },

    #[error("Export {file_id} of scan {scan_id} ended with status '{status}'")]
    ExportFailed {
        scan_id: String,
        file_id: String,
        status: String,
    },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GateError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn decode(operation: &'static str, details: impl std::fmt::Display) -> Self {
        Self::Decode {
            operation,
            details: details.to_string(),
        }
    }
}
