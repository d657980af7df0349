use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use crate::config::credentials::{api_keys_header, sanitize_body};
use crate::config::{ExportFormat, TenableConfig};
use crate::errors::GateError;
use super::provider::ScanApi;
use super::types::*;
use tracing::debug;

// Header names are case-insensitive on the wire; `http` wants them lowercase.
const API_KEYS_HEADER: &str = "x-apikeys";

/// reqwest-backed client for the Tenable.io REST API.
pub struct TenableClient {
    client: Client,
    base_url: String,
    // Kept only to scrub them out of echoed error bodies.
    secrets: [String; 2],
}

impl TenableClient {
    pub fn new(config: &TenableConfig) -> Result<Self, GateError> {
        let mut auth = HeaderValue::from_str(&api_keys_header(&config.access_key, &config.secret_key))
            .map_err(|_| GateError::config("Tenable API keys contain characters not allowed in a header"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEYS_HEADER, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GateError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secrets: [config.access_key.clone(), config.secret_key.clone()],
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response, GateError> {
        let resp = request
            .send()
            .await
            .map_err(|e| GateError::Network(format!("{} request failed: {}", operation, e)))?;

        let status = resp.status();
        debug!(operation, status = status.as_u16(), "Tenable API response");
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let secrets = [self.secrets[0].as_str(), self.secrets[1].as_str()];
        let body = sanitize_body(&body, &secrets);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GateError::Authentication(format!(
                "{} rejected with HTTP {}: {}",
                operation,
                status.as_u16(),
                body
            )));
        }

        Err(GateError::Api { operation, status: status.as_u16(), body })
    }

    async fn json<T: DeserializeOwned>(&self, operation: &'static str, request: RequestBuilder) -> Result<T, GateError> {
        let resp = self.send(operation, request).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GateError::Network(format!("{} response read failed: {}", operation, e)))?;
        serde_json::from_slice(&bytes).map_err(|e| GateError::decode(operation, e))
    }
}

#[async_trait]
impl ScanApi for TenableClient {
    async fn create_scan(&self, request: &CreateScanRequest) -> Result<RemoteId, GateError> {
        let resp: CreateScanResponse = self
            .json("create scan", self.client.post(self.url("/scans")).json(request))
            .await?;
        resp.scan_id()
            .ok_or_else(|| GateError::decode("create scan", "response carries no scan id"))
    }

    async fn launch_scan(&self, scan_id: &RemoteId) -> Result<LaunchResponse, GateError> {
        let url = self.url(&format!("/scans/{}/launch", scan_id));
        let resp = self.send("launch scan", self.client.post(url)).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GateError::Network(format!("launch scan response read failed: {}", e)))?;
        // The body is informational only; an empty or odd one is not fatal.
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }

    async fn scan_status(&self, scan_id: &RemoteId) -> Result<String, GateError> {
        let url = self.url(&format!("/scans/{}", scan_id));
        let details: ScanDetails = self.json("scan status", self.client.get(url)).await?;
        Ok(details.status().to_string())
    }

    async fn request_export(&self, scan_id: &RemoteId, format: ExportFormat) -> Result<RemoteId, GateError> {
        let url = self.url(&format!("/scans/{}/export", scan_id));
        let resp: ExportResponse = self
            .json("request export", self.client.post(url).json(&ExportRequest { format }))
            .await?;
        Ok(resp.file)
    }

    async fn export_status(&self, scan_id: &RemoteId, file_id: &RemoteId) -> Result<String, GateError> {
        let url = self.url(&format!("/scans/{}/export/{}", scan_id, file_id));
        let status: ExportStatus = self.json("export status", self.client.get(url)).await?;
        Ok(status.status().to_string())
    }

    async fn download_export(&self, scan_id: &RemoteId, file_id: &RemoteId) -> Result<Vec<u8>, GateError> {
        let url = self.url(&format!("/scans/{}/export/{}/download", scan_id, file_id));
        let resp = self
            .send("download export", self.client.get(url).header(ACCEPT, "*/*"))
            .await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GateError::Network(format!("download export body read failed: {}", e)))?;
        Ok(bytes.to_vec())
    }

    async fn scan_hosts(&self, scan_id: &RemoteId) -> Result<HostsResponse, GateError> {
        let url = self.url(&format!("/scans/{}/hosts", scan_id));
        self.json("scan hosts", self.client.get(url)).await
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
