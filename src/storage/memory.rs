use std::sync::Mutex;
use async_trait::async_trait;
use crate::errors::GateError;
use super::traits::ReportStore;

/// Keeps uploaded reports in memory. Used for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    objects: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(key, body)` stored so far, in upload order.
    pub fn objects(&self) -> Vec<(String, Vec<u8>)> {
        self.objects.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, GateError> {
        self.objects
            .lock()
            .map_err(|_| GateError::Storage("memory store lock poisoned".into()))?
            .push((key.to_string(), body));
        Ok(format!("memory://{}", key))
    }

    fn store_name(&self) -> &str {
        "memory"
    }
}
