use super::types::GateError;

/// Exit status for a passing gate.
pub const EXIT_PASS: i32 = 0;
/// Exit status when the high-severity count reaches the threshold.
pub const EXIT_FAIL: i32 = 1;
/// Exit status for missing or invalid configuration.
pub const EXIT_CONFIG: i32 = 2;
/// Exit status for remote, network and storage failures.
pub const EXIT_REMOTE: i32 = 3;
/// Exit status when the vendor rejects the API keys.
pub const EXIT_AUTH: i32 = 4;
/// Exit status when a scan or export never reaches its success state.
pub const EXIT_INCOMPLETE: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub exit_code: i32,
}

impl GateError {
    /// Classify this error to determine its type name and the process exit code.
    pub fn classify(&self) -> ErrorClassification {
        let (error_type, exit_code) = match self {
            GateError::Config(_) => ("ConfigError", EXIT_CONFIG),
            GateError::Authentication(_) => ("AuthenticationError", EXIT_AUTH),

            GateError::ScanTerminated { .. } => ("ScanTerminatedError", EXIT_INCOMPLETE),
            GateError::ExportFailed { .. } => ("ExportFailedError", EXIT_INCOMPLETE),
            GateError::Timeout(_) => ("TimeoutError", EXIT_INCOMPLETE),

            GateError::Api { .. } => ("ApiError", EXIT_REMOTE),
            GateError::Network(_) => ("NetworkError", EXIT_REMOTE),
            GateError::Decode { .. } => ("DecodeError", EXIT_REMOTE),
            GateError::Storage(_) => ("StorageError", EXIT_REMOTE),
            GateError::Io(_) => ("IoError", EXIT_REMOTE),
            GateError::Json(_) => ("JsonError", EXIT_REMOTE),

            // A malformed config file is a configuration problem
            GateError::Yaml(_) => ("ConfigError", EXIT_CONFIG),
        };
        ErrorClassification { error_type, exit_code }
    }

    pub fn exit_code(&self) -> i32 {
        self.classify().exit_code
    }
}
