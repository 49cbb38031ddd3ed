//! HTTP transport for the cost API
//!
//! The gateway talks to the API through the [`Transport`] trait so the
//! fallback policy can be exercised without a network.

use async_trait::async_trait;
use costwatch_core::error::{CostwatchError, Result};
use serde_json::Value;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// JSON request/response transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` and decode the body as JSON
    async fn get_json(&self, path: &str) -> Result<Value>;

    /// POST `body` as JSON to `path`, ignoring the response body
    async fn post_json(&self, path: &str, body: &Value) -> Result<()>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Base URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turn a non-2xx response into a transport error
    async fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.text().await {
            Ok(body) if !body.trim().is_empty() => body,
            _ => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        Err(CostwatchError::Transport {
            status: status.as_u16(),
            path: path.to_string(),
            message,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, path: &str) -> Result<Value> {
        debug!("GET {}", self.url(path));
        let response = self.client.get(self.url(path)).send().await?;
        let response = Self::check_status(path, response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| CostwatchError::MalformedPayload(format!("{path}: {e}")))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<()> {
        debug!("POST {}", self.url(path));
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::check_status(path, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let transport = HttpTransport::new("https://costs.example.com/");
        assert_eq!(transport.base_url(), "https://costs.example.com");
        assert_eq!(
            transport.url("/api/costs"),
            "https://costs.example.com/api/costs"
        );
        assert_eq!(
            transport.url("api/reports/weekly"),
            "https://costs.example.com/api/reports/weekly"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let err = transport.get_json("/api/costs").await.unwrap_err();
        assert!(err.is_transport());
    }
}
