use serde::{Deserialize, Serialize};
use crate::errors::{EXIT_FAIL, EXIT_PASS};

/// Outcome of the vulnerability gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// High-severity count strictly below the threshold.
    Pass,
    /// High-severity count at or above the threshold.
    Fail,
}

impl Verdict {
    /// `count >= threshold` fails; a threshold of 0 therefore always fails.
    pub fn evaluate(high_count: u64, threshold: u64) -> Self {
        if high_count >= threshold {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Pass => EXIT_PASS,
            Verdict::Fail => EXIT_FAIL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_equal_to_threshold_fails() {
        assert_eq!(Verdict::evaluate(5, 5), Verdict::Fail);
        assert_eq!(Verdict::evaluate(5, 5).exit_code(), 1);
    }

    #[test]
    fn test_count_below_threshold_passes() {
        assert_eq!(Verdict::evaluate(4, 5), Verdict::Pass);
        assert_eq!(Verdict::evaluate(4, 5).exit_code(), 0);
    }

    #[test]
    fn test_zero_threshold_always_fails() {
        assert_eq!(Verdict::evaluate(0, 0), Verdict::Fail);
    }

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(serde_json::to_string(&Verdict::Pass).unwrap(), "\"PASS\"");
        assert_eq!(serde_json::to_string(&Verdict::Fail).unwrap(), "\"FAIL\"");
    }
}
