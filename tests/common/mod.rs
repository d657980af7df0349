#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agent_scan_gate::config::{
    DriverConfig, ExportFormat, GateConfig, PollPolicy, PollingConfig, ScanConfig, StorageConfig,
    TenableConfig,
};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const ACCESS_KEY: &str = "test-access-0001";
pub const SECRET_KEY: &str = "test-secret-0002";
pub const SCAN_ID: u64 = 101;
pub const FILE_ID: u64 = 555;

/// Behaviour of the fake vendor API for one test.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// Scan reports `completed` on this poll (1-based).
    pub complete_on_poll: u32,
    /// Export reports `ready` on this poll (1-based).
    pub ready_on_poll: u32,
    /// Scan status returned on every poll instead of progressing.
    pub stuck_scan_status: Option<String>,
    /// Export status returned on every poll instead of progressing.
    pub stuck_export_status: Option<String>,
    /// Step answered with HTTP 500: "create", "launch", "status", "export", "download", "hosts".
    pub fail_step: Option<&'static str>,
    /// Return the created id nested under `scan` instead of top level.
    pub nested_scan_id: bool,
    pub report: Vec<u8>,
    pub hosts: Value,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            complete_on_poll: 1,
            ready_on_poll: 1,
            stuck_scan_status: None,
            stuck_export_status: None,
            fail_step: None,
            nested_scan_id: false,
            // Not valid UTF-8 on purpose
            report: b"Plugin ID,Risk,Host\n19506,None,10.0.0.12\n\xff\xfe\x00end".to_vec(),
            hosts: hosts_with(&[(4, 3), (3, 10)]),
        }
    }
}

/// Build a hosts payload from `(severity, count)` pairs, spread over two hosts.
pub fn hosts_with(counts: &[(i64, usize)]) -> Value {
    let mut first = Vec::new();
    let mut second = Vec::new();
    for (severity, count) in counts {
        for i in 0..*count {
            let vuln = json!({"plugin_id": 1000 + i, "plugin_name": "finding", "severity": severity});
            if i % 2 == 0 {
                first.push(vuln);
            } else {
                second.push(vuln);
            }
        }
    }
    json!({
        "hosts": [
            {"hostname": "ip-10-0-0-12", "vulnerabilities": first},
            {"hostname": "ip-10-0-0-13", "vulnerabilities": second}
        ]
    })
}

#[derive(Debug, Default)]
pub struct MockTenable {
    pub behavior: MockBehavior,
    requests: Mutex<Vec<String>>,
    create_bodies: Mutex<Vec<Value>>,
    export_bodies: Mutex<Vec<Value>>,
    scan_polls: AtomicU32,
    export_polls: AtomicU32,
}

impl MockTenable {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn create_bodies(&self) -> Vec<Value> {
        self.create_bodies.lock().unwrap().clone()
    }

    pub fn export_bodies(&self) -> Vec<Value> {
        self.export_bodies.lock().unwrap().clone()
    }

    pub fn scan_polls(&self) -> u32 {
        self.scan_polls.load(Ordering::SeqCst)
    }

    pub fn export_polls(&self) -> u32 {
        self.export_polls.load(Ordering::SeqCst)
    }

    pub fn count_requests(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|r| r.starts_with(prefix)).count()
    }

    fn record(&self, line: String) {
        self.requests.lock().unwrap().push(line);
    }

    fn failing(&self, step: &str) -> bool {
        self.behavior.fail_step == Some(step)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("accessKey={}; secretKey={}", ACCESS_KEY, SECRET_KEY);
    headers
        .get("x-apikeys")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false)
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "Internal server error"}))).into_response()
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid Credentials"}))).into_response()
}

type Shared = State<Arc<MockTenable>>;

async fn create_scan(State(mock): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    mock.record("POST /scans".into());
    if !authorized(&headers) {
        return unauthorized();
    }
    mock.create_bodies.lock().unwrap().push(body);
    if mock.failing("create") {
        return server_error();
    }
    if mock.behavior.nested_scan_id {
        Json(json!({"scan": {"id": SCAN_ID, "uuid": "template-agent"}})).into_response()
    } else {
        Json(json!({"id": SCAN_ID})).into_response()
    }
}

async fn launch_scan(State(mock): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    mock.record(format!("POST /scans/{}/launch", id));
    if !authorized(&headers) {
        return unauthorized();
    }
    if mock.failing("launch") {
        return server_error();
    }
    Json(json!({"scan_uuid": "6b5c8e4f-launch"})).into_response()
}

async fn scan_details(State(mock): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    mock.record(format!("GET /scans/{}", id));
    if !authorized(&headers) {
        return unauthorized();
    }
    if mock.failing("status") {
        return server_error();
    }
    let n = mock.scan_polls.fetch_add(1, Ordering::SeqCst) + 1;
    let status = match &mock.behavior.stuck_scan_status {
        Some(status) => status.clone(),
        None if n >= mock.behavior.complete_on_poll => "Completed".to_string(),
        None => "running".to_string(),
    };
    Json(json!({"info": {"status": status, "name": "mock scan"}, "hosts": []})).into_response()
}

async fn request_export(
    State(mock): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    mock.record(format!("POST /scans/{}/export", id));
    if !authorized(&headers) {
        return unauthorized();
    }
    mock.export_bodies.lock().unwrap().push(body);
    if mock.failing("export") {
        return server_error();
    }
    Json(json!({"file": FILE_ID})).into_response()
}

async fn export_status(
    State(mock): Shared,
    headers: HeaderMap,
    Path((id, file)): Path<(String, String)>,
) -> Response {
    mock.record(format!("GET /scans/{}/export/{}", id, file));
    if !authorized(&headers) {
        return unauthorized();
    }
    let n = mock.export_polls.fetch_add(1, Ordering::SeqCst) + 1;
    let status = match &mock.behavior.stuck_export_status {
        Some(status) => status.clone(),
        None if n >= mock.behavior.ready_on_poll => "ready".to_string(),
        None => "loading".to_string(),
    };
    Json(json!({"status": status})).into_response()
}

async fn download_export(
    State(mock): Shared,
    headers: HeaderMap,
    Path((id, file)): Path<(String, String)>,
) -> Response {
    mock.record(format!("GET /scans/{}/export/{}/download", id, file));
    if !authorized(&headers) {
        return unauthorized();
    }
    if mock.failing("download") {
        return server_error();
    }
    (StatusCode::OK, mock.behavior.report.clone()).into_response()
}

async fn scan_hosts(State(mock): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    mock.record(format!("GET /scans/{}/hosts", id));
    if !authorized(&headers) {
        return unauthorized();
    }
    if mock.failing("hosts") {
        return server_error();
    }
    Json(mock.behavior.hosts.clone()).into_response()
}

/// Start the fake vendor API on an ephemeral port; returns its base URL.
pub async fn spawn_tenable(behavior: MockBehavior) -> (String, Arc<MockTenable>) {
    let mock = Arc::new(MockTenable { behavior, ..Default::default() });
    let app = Router::new()
        .route("/scans", post(create_scan))
        .route("/scans/:id", get(scan_details))
        .route("/scans/:id/launch", post(launch_scan))
        .route("/scans/:id/export", post(request_export))
        .route("/scans/:id/export/:file", get(export_status))
        .route("/scans/:id/export/:file/download", get(download_export))
        .route("/scans/:id/hosts", get(scan_hosts))
        .with_state(mock.clone());

    (serve(app).await, mock)
}

/// Minimal path-style S3 endpoint accepting `PUT /{bucket}/{key}`.
#[derive(Debug, Default)]
pub struct MockS3 {
    objects: Mutex<HashMap<String, usize>>,
}

impl MockS3 {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

async fn put_object(
    State(s3): State<Arc<MockS3>>,
    Path((bucket, key)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    s3.objects.lock().unwrap().insert(format!("{}/{}", bucket, key), body.len());
    let mut headers = HeaderMap::new();
    headers.insert("etag", "\"mock-etag\"".parse().unwrap());
    (StatusCode::OK, headers).into_response()
}

pub async fn spawn_s3() -> (String, Arc<MockS3>) {
    let s3 = Arc::new(MockS3::default());
    let app = Router::new()
        .route("/:bucket/*key", put(put_object))
        .with_state(s3.clone());
    (serve(app).await, s3)
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn tenable_config(base_url: &str) -> TenableConfig {
    TenableConfig {
        base_url: base_url.to_string(),
        access_key: ACCESS_KEY.to_string(),
        secret_key: SECRET_KEY.to_string(),
        timeout: Duration::from_secs(10),
    }
}

/// Driver config pointed at the mock with millisecond polling.
pub fn driver_config(base_url: &str) -> DriverConfig {
    DriverConfig {
        tenable: tenable_config(base_url),
        scan: ScanConfig {
            name: "AMI-Agent-Scan-test".to_string(),
            target: "ip-10-0-0-12".to_string(),
            folder_id: Some(17),
            export_format: ExportFormat::Csv,
        },
        polling: PollingConfig {
            scan: PollPolicy::every(Duration::from_millis(5)),
            export: PollPolicy::every(Duration::from_millis(2)),
        },
        storage: StorageConfig {
            bucket: "scan-reports".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            key_prefix: "tenable-reports".to_string(),
        },
        gate: GateConfig { high_threshold: 5 },
    }
}
