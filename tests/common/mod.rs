//! Common test utilities and helpers for costwatch tests
//!
//! This module provides a scripted transport, payload builders and an
//! object-store fixture so integration tests can run without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use costwatch_core::error::{CostwatchError, Result};
use costwatch_gateway::Transport;
use filetime::FileTime;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Fixed generation time used by rendering tests
pub fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 14, 9, 30, 0).unwrap()
}

/// Transport that answers from a table of canned responses
///
/// Paths without an entry fail with a 503, which is what the gateway sees
/// when the API is down.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<(String, String, Option<Value>)>>,
}

impl ScriptedTransport {
    /// Transport where every request fails
    pub fn offline() -> Self {
        Self::default()
    }

    /// Answer `path` with `body`
    pub fn with_response(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    /// Number of requests made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Body of the last POST to `path`
    pub fn last_post(&self, path: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(method, p, _)| method == "POST" && p == path)
            .and_then(|(_, _, body)| body.clone())
    }

    fn unavailable(path: &str) -> CostwatchError {
        CostwatchError::Transport {
            status: 503,
            path: path.to_string(),
            message: "Service Unavailable".to_string(),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push(("GET".to_string(), path.to_string(), None));
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| Self::unavailable(path))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(("POST".to_string(), path.to_string(), Some(body.clone())));
        if self.responses.contains_key(path) {
            Ok(())
        } else {
            Err(Self::unavailable(path))
        }
    }
}

/// Cost summary in the older, tag-based shape
pub fn tag_shaped_summary() -> Value {
    json!({
        "total": 1247.85,
        "weeklyDeltaPercent": 4.2,
        "periodStart": "2024-10-01T00:00:00Z",
        "periodEnd": "2024-10-31T23:59:59Z",
        "byTag": [
            { "tag": "Production", "cost": 687.45 },
            { "tag": "Development", "cost": 234.20 }
        ]
    })
}

/// Cost summary in the current, service-based shape
pub fn service_shaped_summary() -> Value {
    json!({
        "totalCost": 1247.85,
        "trend": -12.5,
        "periodStart": "2024-10-07",
        "periodEnd": "2024-10-13",
        "byService": [{ "service": "EC2", "cost": 487.20 }]
    })
}

/// Weekly report payload as served by the report API
pub fn weekly_report_payload() -> Value {
    json!({
        "period": "Oct 7 - Oct 13, 2024",
        "totalCost": 1247.85,
        "weeklyChange": -3.2,
        "potentialSavings": 500.0,
        "resourceCount": 2,
        "costBreakdown": [
            { "service": "EC2", "currentCost": 812.40, "previousCost": 640.00, "changePercent": 26.9 },
            { "service": "S3", "currentCost": 96.10, "previousCost": 101.75, "changePercent": -5.6 }
        ],
        "unusedResources": [
            { "id": "vol-0a1b", "type": "EBS Volume", "region": "us-east-1",
              "estimatedMonthlySavingsUsd": 8.0, "details": "Delete or snapshot" },
            { "id": "eip-1", "type": "Elastic IP", "estimatedMonthlySavingsUsd": 3.6 }
        ],
        "recommendations": ["Delete unattached EBS volumes", "Release idle Elastic IPs"]
    })
}

/// Write an object into a directory-backed bucket with a fixed mtime
pub fn put_object(root: &Path, bucket: &str, key: &str, body: &str, unix_secs: i64) {
    let path = root.join(bucket).join(key);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, body).unwrap();
    filetime::set_file_mtime(&path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
}

/// Temporary storage root with an empty bucket
pub fn storage_with_bucket(bucket: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join(bucket)).unwrap();
    temp
}
