use serde::Serialize;
use crate::config::GateConfig;
use crate::models::{Severity, Verdict};

/// Highest-severity count compared against the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateReport {
    pub severity: Severity,
    pub high_count: u64,
    pub threshold: u64,
    pub verdict: Verdict,
}

impl GateReport {
    pub fn evaluate(high_count: u64, config: &GateConfig) -> Self {
        Self {
            severity: Severity::GATED,
            high_count,
            threshold: config.high_threshold,
            verdict: Verdict::evaluate(high_count, config.high_threshold),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }

    /// Human-readable verdict line.
    pub fn message(&self) -> String {
        match self.verdict {
            Verdict::Pass => format!(
                "Scan PASSED: {} high severity vulnerabilities (threshold {})",
                self.high_count, self.threshold
            ),
            Verdict::Fail => format!(
                "Scan FAILED: {} high severity vulnerabilities reach threshold {}",
                self.high_count, self.threshold
            ),
        }
    }
}
