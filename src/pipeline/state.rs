use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::gate::GateReport;
use crate::tenable::RemoteId;

/// Steps of a single scan run, in the only order they can happen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ScanPhase {
    Created,
    Launched,
    Completed,
    Exported,
    Uploaded,
    Counted,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Launched => write!(f, "launched"),
            Self::Completed => write!(f, "completed"),
            Self::Exported => write!(f, "exported"),
            Self::Uploaded => write!(f, "uploaded"),
            Self::Counted => write!(f, "counted"),
        }
    }
}

/// Report bytes as downloaded, untouched.
#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub file_id: RemoteId,
    pub bytes: Vec<u8>,
    pub polls: u32,
}

/// Result of a completed run, printed as JSON with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scan_id: RemoteId,
    pub scan_name: String,
    pub target: String,
    pub report_key: String,
    pub report_location: String,
    pub report_bytes: usize,
    pub scan_polls: u32,
    pub export_polls: u32,
    pub gate: GateReport,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn exit_code(&self) -> i32 {
        self.gate.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert!(ScanPhase::Created < ScanPhase::Launched);
        assert!(ScanPhase::Exported < ScanPhase::Uploaded);
        assert!(ScanPhase::Uploaded < ScanPhase::Counted);
    }

    #[test]
    fn test_phase_display_matches_serde() {
        let json = serde_json::to_string(&ScanPhase::Launched).unwrap();
        assert_eq!(json, format!("\"{}\"", ScanPhase::Launched));
    }
}
