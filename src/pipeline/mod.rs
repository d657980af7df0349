pub mod driver;
pub mod poller;
pub mod state;

pub use driver::{count_high_findings, ScanDriver};
pub use poller::{poll_until, PollOutcome, PollState};
pub use state::{ExportedReport, RunSummary, ScanPhase};
