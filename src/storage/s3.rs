use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use crate::config::StorageConfig;
use crate::errors::GateError;
use super::traits::ReportStore;
use tracing::{debug, info};

/// Uploads reports with a single S3 `PutObject`. Encryption, versioning and
/// ACLs are whatever the bucket defaults to.
pub struct S3ReportStore {
    client: Client,
    bucket: String,
}

impl S3ReportStore {
    /// Resolve AWS credentials the standard way (env, profile, instance role).
    /// Nothing is fetched until the first upload.
    pub async fn new(config: &StorageConfig) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        // A failed upload fails the run like any other remote call
        let mut builder = aws_sdk_s3::config::Builder::from(&shared).retry_config(RetryConfig::disabled());
        if let Some(endpoint) = &config.endpoint_url {
            debug!(endpoint = %endpoint, "Using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        }
    }

    pub fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[async_trait]
impl ReportStore for S3ReportStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, GateError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                GateError::Storage(format!(
                    "PutObject to {} failed: {}",
                    self.location(key),
                    DisplayErrorContext(&e)
                ))
            })?;

        let location = self.location(key);
        info!(location = %location, bytes = size, "Uploaded report");
        Ok(location)
    }

    fn store_name(&self) -> &str {
        "s3"
    }
}
