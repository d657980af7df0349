use async_trait::async_trait;
use crate::errors::GateError;

/// Destination for exported reports.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Store `body` under `key` unchanged and return its fully-qualified location.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, GateError>;

    /// Store name for logging
    fn store_name(&self) -> &str;
}
