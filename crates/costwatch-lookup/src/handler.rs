//! Latest report lookup
//!
//! Lists the report objects under the configured prefix, picks the most
//! recently modified one and returns its bytes unchanged. Listing and fetch
//! are two separate calls; an object replaced or removed in between is
//! reported as a fault rather than retried.

use crate::store::{ObjectStore, ObjectSummary};
use costwatch_core::error::{CostwatchError, Result};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

/// Default key prefix for stored reports
pub const DEFAULT_PREFIX: &str = "reports/";

/// Body returned when the prefix holds no objects
pub const NO_REPORTS_MESSAGE: &str = "No reports found.";

/// Where reports are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Bucket name
    pub bucket: String,
    /// Key prefix
    pub prefix: String,
}

impl LookupConfig {
    /// Config for `bucket` with the default prefix
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Override the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Reject configuration that can never list anything
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(CostwatchError::Config(
                "reports bucket is not configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response produced by the lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    /// HTTP-style status code
    pub status_code: u16,
    /// Response headers in a fixed order
    pub headers: Vec<(String, String)>,
    /// Body text
    pub body: String,
}

impl LookupResponse {
    fn new(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            ],
            body,
        }
    }

    fn error(status_code: u16, message: &str) -> Self {
        Self::new(status_code, json!({ "error": message }).to_string())
    }

    /// Whether the lookup found a report
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Look up a header by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The most recently modified object
///
/// Objects with the same modification time are ordered by key, and the
/// greatest key wins, so the choice never depends on listing order.
pub fn latest_object(objects: &[ObjectSummary]) -> Option<&ObjectSummary> {
    objects
        .iter()
        .max_by(|a, b| (a.last_modified, &a.key).cmp(&(b.last_modified, &b.key)))
}

/// Serves the latest stored report
pub struct LatestReportHandler<S: ObjectStore> {
    store: S,
    config: LookupConfig,
}

impl<S: ObjectStore> LatestReportHandler<S> {
    /// Create a handler over a store
    pub fn new(store: S, config: LookupConfig) -> Self {
        Self { store, config }
    }

    /// Handler configuration
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Find the latest report
    ///
    /// Returns `None` when the prefix holds no objects.
    pub async fn find_latest(&self) -> Result<Option<(ObjectSummary, Vec<u8>)>> {
        self.config.validate()?;
        let objects = self
            .store
            .list_objects(&self.config.bucket, &self.config.prefix)
            .await?;

        let Some(latest) = latest_object(&objects) else {
            return Ok(None);
        };
        let body = self
            .store
            .get_object(&self.config.bucket, &latest.key)
            .await?;
        Ok(Some((latest.clone(), body)))
    }

    /// Latest report as text; bytes that are not UTF-8 are a storage fault
    async fn latest_body(&self) -> Result<Option<(ObjectSummary, String)>> {
        let Some((object, body)) = self.find_latest().await? else {
            return Ok(None);
        };
        let text = String::from_utf8(body).map_err(|e| {
            CostwatchError::StorageFault(format!("{} is not valid UTF-8: {e}", object.key))
        })?;
        Ok(Some((object, text)))
    }

    /// Run the lookup and produce a response
    ///
    /// 200 with the object bytes, 404 when nothing is stored under the
    /// prefix, 500 with the error message for any fault.
    pub async fn handle(&self) -> LookupResponse {
        match self.latest_body().await {
            Ok(Some((object, body))) => {
                info!(
                    "Serving latest report {} (modified {})",
                    object.key, object.last_modified
                );
                LookupResponse::new(200, body)
            }
            Ok(None) => {
                warn!(
                    "No reports under {}/{}",
                    self.config.bucket, self.config.prefix
                );
                LookupResponse::error(404, NO_REPORTS_MESSAGE)
            }
            Err(e) => {
                error!("Latest report lookup failed: {}", e);
                LookupResponse::error(500, &e.to_string())
            }
        }
    }
}
