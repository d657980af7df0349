pub mod client;
pub mod provider;
pub mod types;

pub use client::TenableClient;
pub use provider::ScanApi;
pub use types::{CreateScanRequest, HostsResponse, LaunchResponse, RemoteId};
