use std::future::Future;
use std::time::{Duration, Instant};

use crate::config::PollPolicy;
use crate::errors::GateError;
use tracing::{error, info};

/// Scan statuses after which `completed` can no longer be reached.
pub const SCAN_FAILURE_STATUSES: &[&str] = &["aborted", "canceled", "cancelled", "stopped"];

/// Export statuses after which `ready` can no longer be reached.
pub const EXPORT_FAILURE_STATUSES: &[&str] = &["error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Pending,
    Done,
    Failed,
}

/// Scan status: `completed` in any case is done.
pub fn scan_state(status: &str) -> PollState {
    let status = status.trim().to_ascii_lowercase();
    if status == "completed" {
        PollState::Done
    } else if SCAN_FAILURE_STATUSES.contains(&status.as_str()) {
        PollState::Failed
    } else {
        PollState::Pending
    }
}

/// Export status: only an exact `ready` is done.
pub fn export_state(status: &str) -> PollState {
    if status == "ready" {
        PollState::Done
    } else if EXPORT_FAILURE_STATUSES.contains(&status.trim().to_ascii_lowercase().as_str()) {
        PollState::Failed
    } else {
        PollState::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    /// Status reported by the final poll.
    pub status: String,
    /// Number of status requests issued, including the final one.
    pub polls: u32,
    pub elapsed: Duration,
}

/// Fetch a remote status until `classify` reports it done.
///
/// Sleeps `policy.interval` between polls, never after the last one, so a
/// status that becomes done on the Nth poll costs exactly N requests.
/// A failed status ends the loop with `on_failure(status)`. When
/// `policy.max_wait` is set and the next poll would start past it, the loop
/// ends with a `Timeout`. Errors from `fetch` propagate immediately.
pub async fn poll_until<F, Fut>(
    label: &str,
    policy: PollPolicy,
    classify: fn(&str) -> PollState,
    on_failure: impl FnOnce(String) -> GateError,
    mut fetch: F,
) -> Result<PollOutcome, GateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, GateError>>,
{
    let start = Instant::now();
    let mut polls: u32 = 0;

    loop {
        let status = fetch().await?;
        polls += 1;
        info!(label, status = %status, poll = polls, "Polled status");

        match classify(&status) {
            PollState::Done => {
                return Ok(PollOutcome { status, polls, elapsed: start.elapsed() });
            }
            PollState::Failed => {
                error!(label, status = %status, poll = polls, "Remote job reached a terminal failure status");
                return Err(on_failure(status));
            }
            PollState::Pending => {}
        }

        if let Some(max_wait) = policy.max_wait {
            if start.elapsed() + policy.interval > max_wait {
                return Err(GateError::Timeout(format!(
                    "{} still '{}' after {} polls ({}s limit)",
                    label,
                    status,
                    polls,
                    max_wait.as_secs()
                )));
            }
        }

        tokio::time::sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast() -> PollPolicy {
        PollPolicy::every(Duration::from_millis(1))
    }

    fn terminated(status: String) -> GateError {
        GateError::ScanTerminated { scan_id: "1".into(), status }
    }

    #[test]
    fn test_scan_state_case_insensitive() {
        assert_eq!(scan_state("completed"), PollState::Done);
        assert_eq!(scan_state("COMPLETED"), PollState::Done);
        assert_eq!(scan_state("Completed"), PollState::Done);
        assert_eq!(scan_state("running"), PollState::Pending);
        assert_eq!(scan_state(""), PollState::Pending);
        assert_eq!(scan_state("Aborted"), PollState::Failed);
        assert_eq!(scan_state("canceled"), PollState::Failed);
    }

    #[test]
    fn test_export_state_exact_ready() {
        assert_eq!(export_state("ready"), PollState::Done);
        assert_eq!(export_state("loading"), PollState::Pending);
        assert_eq!(export_state("error"), PollState::Failed);
    }

    #[tokio::test]
    async fn test_done_on_nth_poll() {
        let calls = Cell::new(0u32);
        let outcome = poll_until("scan", fast(), scan_state, terminated, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { Ok(if n == 4 { "completed".to_string() } else { "running".to_string() }) }
        })
        .await
        .unwrap();

        assert_eq!(outcome.polls, 4);
        assert_eq!(calls.get(), 4);
        assert_eq!(outcome.status, "completed");
    }

    #[tokio::test]
    async fn test_interval_between_polls() {
        let policy = PollPolicy::every(Duration::from_millis(20));
        let calls = Cell::new(0u32);
        let outcome = poll_until("scan", policy, scan_state, terminated, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { Ok(if n == 3 { "completed".to_string() } else { "pending".to_string() }) }
        })
        .await
        .unwrap();

        // Two sleeps between three polls
        assert!(outcome.elapsed >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_failure_status_stops_loop() {
        let calls = Cell::new(0u32);
        let result = poll_until("scan", fast(), scan_state, terminated, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { Ok(if n == 2 { "aborted".to_string() } else { "running".to_string() }) }
        })
        .await;

        match result {
            Err(GateError::ScanTerminated { status, .. }) => assert_eq!(status, "aborted"),
            other => panic!("expected ScanTerminated, got {:?}", other),
        }
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_max_wait_times_out() {
        let policy = PollPolicy::every(Duration::from_millis(5)).with_max_wait(Duration::from_millis(20));
        let result = poll_until("export 3", policy, export_state, terminated, || async {
            Ok("loading".to_string())
        })
        .await;

        match result {
            Err(GateError::Timeout(msg)) => assert!(msg.contains("export 3")),
            other => panic!("expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_without_retry() {
        let calls = Cell::new(0u32);
        let result = poll_until("scan", fast(), scan_state, terminated, || {
            calls.set(calls.get() + 1);
            async { Err(GateError::Network("connection reset".into())) }
        })
        .await;

        assert!(matches!(result, Err(GateError::Network(_))));
        assert_eq!(calls.get(), 1);
    }
}
