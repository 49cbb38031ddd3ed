//! Cost data gateway
//!
//! Dashboard reads degrade gracefully: when the cost summary, the unused
//! resource list or the weekly report cannot be fetched, the gateway logs
//! the failure and substitutes static fallback data. An explicit request for
//! the latest stored report is different and surfaces its failure, as do the
//! two POST actions. Nothing is retried.

use crate::transport::Transport;
use costwatch_core::assembler::assemble_from_payload;
use costwatch_core::error::Result;
use costwatch_core::fallback;
use costwatch_core::normalizer::{normalize_cost_summary, normalize_unused_resources};
use costwatch_core::types::{
    BudgetSubscription, CostSummary, UnusedResource, WeeklyReport, WeeklyReportRequest,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Cost summary endpoint
pub const COSTS_PATH: &str = "/api/costs";
/// Unused resource listing endpoint
pub const UNUSED_RESOURCES_PATH: &str = "/api/resources/unused";
/// Latest stored report endpoint
pub const LATEST_REPORT_PATH: &str = "/api/reports";
/// Weekly report endpoint (GET to fetch, POST to request)
pub const WEEKLY_REPORT_PATH: &str = "/api/reports/weekly";
/// Budget alert subscription endpoint
pub const SUBSCRIBE_PATH: &str = "/api/budget/subscribe";

/// Where a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DataSource {
    /// Fetched from the API
    Live,
    /// Substituted from static data after a failed fetch
    Fallback,
}

/// A fetched value tagged with its source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched<T> {
    /// The value
    pub data: T,
    /// Where it came from
    pub source: DataSource,
}

impl<T> Fetched<T> {
    fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
        }
    }

    fn fallback(data: T) -> Self {
        Self {
            data,
            source: DataSource::Fallback,
        }
    }

    /// Whether the value is substituted data
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Cost summary
    pub summary: Fetched<CostSummary>,
    /// Unused resources
    pub unused_resources: Fetched<Vec<UnusedResource>>,
}

/// Client for the cost API
pub struct CostDataGateway<T: Transport> {
    transport: T,
}

impl<T: Transport> CostDataGateway<T> {
    /// Create a gateway over a transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the cost summary, falling back to static data on failure
    pub async fn fetch_cost_summary(&self) -> Fetched<CostSummary> {
        let result = async {
            let payload = self.transport.get_json(COSTS_PATH).await?;
            normalize_cost_summary(&payload)
        }
        .await;

        match result {
            Ok(summary) => {
                info!("Fetched cost summary ({} entries)", summary.breakdown.len());
                Fetched::live(summary)
            }
            Err(e) => {
                warn!("Failed to fetch cost summary: {}, using fallback data", e);
                Fetched::fallback(fallback::cost_summary())
            }
        }
    }

    /// Fetch unused resources, falling back to static data on failure
    pub async fn fetch_unused_resources(&self) -> Fetched<Vec<UnusedResource>> {
        match self.transport.get_json(UNUSED_RESOURCES_PATH).await {
            Ok(payload) => {
                let resources = normalize_unused_resources(&payload);
                info!("Fetched {} unused resources", resources.len());
                Fetched::live(resources)
            }
            Err(e) => {
                warn!("Failed to fetch unused resources: {}, using fallback data", e);
                Fetched::fallback(fallback::unused_resources())
            }
        }
    }

    /// Fetch the summary and unused resources concurrently
    pub async fn fetch_dashboard(&self) -> Dashboard {
        let (summary, unused_resources) =
            futures::join!(self.fetch_cost_summary(), self.fetch_unused_resources());
        Dashboard {
            summary,
            unused_resources,
        }
    }

    /// Fetch the weekly report, falling back to an empty report on failure
    pub async fn fetch_weekly_report(&self) -> Fetched<WeeklyReport> {
        let result = async {
            let payload = self.transport.get_json(WEEKLY_REPORT_PATH).await?;
            assemble_from_payload(&payload)
        }
        .await;

        match result {
            Ok(report) => {
                info!("Fetched weekly report for {}", report.period);
                Fetched::live(report)
            }
            Err(e) => {
                warn!("Failed to fetch weekly report: {}, using fallback report", e);
                Fetched::fallback(fallback::weekly_report())
            }
        }
    }

    /// Fetch the latest stored report payload
    ///
    /// # Errors
    ///
    /// Any transport failure is returned to the caller; no fallback is used.
    pub async fn fetch_latest_report(&self) -> Result<Value> {
        self.transport.get_json(LATEST_REPORT_PATH).await
    }

    /// Ask the API to generate a weekly report
    ///
    /// # Errors
    ///
    /// Validation failures are returned before any request is made;
    /// transport failures are returned as-is.
    pub async fn request_weekly_report(&self, request: &WeeklyReportRequest) -> Result<()> {
        request.validate()?;
        self.transport
            .post_json(WEEKLY_REPORT_PATH, &serde_json::to_value(request)?)
            .await?;
        info!(
            "Requested weekly report for {} to {}",
            request.start_date, request.end_date
        );
        Ok(())
    }

    /// Subscribe to budget alerts
    ///
    /// # Errors
    ///
    /// Validation failures are returned before any request is made;
    /// transport failures are returned as-is.
    pub async fn subscribe_budget_alerts(&self, subscription: &BudgetSubscription) -> Result<()> {
        subscription.validate()?;
        self.transport
            .post_json(SUBSCRIBE_PATH, &serde_json::to_value(subscription)?)
            .await?;
        info!(
            "Subscribed {} to budget {} at {}%",
            subscription.email, subscription.budget_id, subscription.threshold_percent
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use costwatch_core::error::CostwatchError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned replies keyed by path; unknown paths fail like a dead network
    #[derive(Default)]
    struct StubTransport {
        replies: HashMap<&'static str, Value>,
        calls: Mutex<Vec<String>>,
    }

    impl StubTransport {
        fn with(mut self, path: &'static str, body: Value) -> Self {
            self.replies.insert(path, body);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get_json(&self, path: &str) -> Result<Value> {
            self.calls.lock().unwrap().push(format!("GET {path}"));
            self.replies
                .get(path)
                .cloned()
                .ok_or_else(|| CostwatchError::Transport {
                    status: 503,
                    path: path.to_string(),
                    message: "unavailable".to_string(),
                })
        }

        async fn post_json(&self, path: &str, _body: &Value) -> Result<()> {
            self.calls.lock().unwrap().push(format!("POST {path}"));
            if self.replies.contains_key(path) {
                Ok(())
            } else {
                Err(CostwatchError::Transport {
                    status: 503,
                    path: path.to_string(),
                    message: "unavailable".to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_live_summary_is_normalized() {
        let gateway = CostDataGateway::new(StubTransport::default().with(
            COSTS_PATH,
            json!({
                "totalCost": 1247.85,
                "periodStart": "2024-10-01",
                "periodEnd": "2024-10-08",
                "trend": -12.5,
                "byService": [{ "service": "EC2", "cost": 487.20 }]
            }),
        ));

        let summary = gateway.fetch_cost_summary().await;
        assert_eq!(summary.source, DataSource::Live);
        assert_eq!(summary.data.total_cost, 1247.85);
        assert_eq!(summary.data.breakdown[0].label, "EC2");
    }

    #[tokio::test]
    async fn test_summary_failure_uses_fallback() {
        let gateway = CostDataGateway::new(StubTransport::default());
        let summary = gateway.fetch_cost_summary().await;
        assert!(summary.is_fallback());
        assert_eq!(summary.data, fallback::cost_summary());
    }

    #[tokio::test]
    async fn test_summary_without_period_uses_fallback() {
        let gateway = CostDataGateway::new(
            StubTransport::default().with(COSTS_PATH, json!({ "totalCost": 5.0 })),
        );
        assert!(gateway.fetch_cost_summary().await.is_fallback());
    }

    #[tokio::test]
    async fn test_weekly_report_failure_uses_fallback() {
        let gateway = CostDataGateway::new(StubTransport::default());
        let report = gateway.fetch_weekly_report().await;
        assert!(report.is_fallback());
        assert_eq!(report.data, fallback::weekly_report());
        assert_eq!(report.data.potential_savings, 0.0);
    }

    #[tokio::test]
    async fn test_malformed_weekly_report_uses_fallback() {
        let gateway = CostDataGateway::new(
            StubTransport::default().with(WEEKLY_REPORT_PATH, json!(["not", "a", "report"])),
        );
        assert!(gateway.fetch_weekly_report().await.is_fallback());
    }

    #[tokio::test]
    async fn test_array_summary_uses_fallback() {
        let gateway = CostDataGateway::new(
            StubTransport::default().with(COSTS_PATH, json!(["2024-10-01", "2024-10-08"])),
        );
        let summary = gateway.fetch_cost_summary().await;
        assert!(summary.is_fallback());
        assert_eq!(summary.data, fallback::cost_summary());
    }

    #[tokio::test]
    async fn test_latest_report_failure_propagates() {
        let gateway = CostDataGateway::new(StubTransport::default());
        let err = gateway.fetch_latest_report().await.unwrap_err();
        assert!(matches!(err, CostwatchError::Transport { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_dashboard_joins_both_fetches() {
        let gateway = CostDataGateway::new(StubTransport::default().with(
            UNUSED_RESOURCES_PATH,
            json!([{ "id": "eip-1", "type": "Elastic IP", "estimatedMonthlySavingsUsd": 3.6 }]),
        ));

        let dashboard = gateway.fetch_dashboard().await;
        assert!(dashboard.summary.is_fallback());
        assert_eq!(dashboard.unused_resources.source, DataSource::Live);
        assert_eq!(dashboard.unused_resources.data[0].id, "eip-1");

        let mut calls = gateway.transport().calls();
        calls.sort();
        assert_eq!(calls, ["GET /api/costs", "GET /api/resources/unused"]);
    }

    #[tokio::test]
    async fn test_invalid_subscription_makes_no_request() {
        let gateway =
            CostDataGateway::new(StubTransport::default().with(SUBSCRIBE_PATH, json!({})));
        let subscription = BudgetSubscription {
            budget_id: "monthly-ops".into(),
            email: "ops@example.com".into(),
            threshold_percent: -5.0,
        };

        let err = gateway
            .subscribe_budget_alerts(&subscription)
            .await
            .unwrap_err();
        assert!(matches!(err, CostwatchError::Validation(_)));
        assert!(gateway.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_transport_failure_surfaces() {
        let gateway = CostDataGateway::new(StubTransport::default());
        let subscription = BudgetSubscription {
            budget_id: "monthly-ops".into(),
            email: "ops@example.com".into(),
            threshold_percent: 80.0,
        };

        let err = gateway
            .subscribe_budget_alerts(&subscription)
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(gateway.transport().calls(), ["POST /api/budget/subscribe"]);
    }

    #[tokio::test]
    async fn test_request_weekly_report() {
        use chrono::NaiveDate;

        let gateway =
            CostDataGateway::new(StubTransport::default().with(WEEKLY_REPORT_PATH, json!({})));
        let request = WeeklyReportRequest {
            start_date: NaiveDate::from_ymd_opt(2024, 10, 7).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 10, 13).unwrap(),
            email: Some("finops@example.com".into()),
        };
        gateway.request_weekly_report(&request).await.unwrap();
        assert_eq!(gateway.transport().calls(), ["POST /api/reports/weekly"]);

        let reversed = WeeklyReportRequest {
            start_date: request.end_date,
            end_date: request.start_date,
            email: None,
        };
        assert!(gateway.request_weekly_report(&reversed).await.is_err());
        assert_eq!(gateway.transport().calls().len(), 1);
    }
}
