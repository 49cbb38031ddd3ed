//! Local report composition
//!
//! Builds a weekly report from a JSON file of raw per-service costs for the
//! current and previous week, for when no report API is reachable. The file
//! looks like:
//!
//! ```json
//! {
//!   "period": "Oct 7 - Oct 13, 2024",
//!   "currentCosts": { "EC2": 812.40, "S3": 96.10 },
//!   "previousCosts": { "EC2": 640.00, "S3": 101.75 },
//!   "unusedResources": [
//!     { "id": "vol-0a1b", "type": "EBS Volume", "region": "us-east-1",
//!       "estimatedMonthlySavingsUsd": 8.0 }
//!   ],
//!   "recommendations": ["Delete unattached EBS volumes"]
//! }
//! ```
//!
//! `potentialSavings` and `resourceCount` may be given explicitly; when they
//! are absent they are derived from the unused resource list. Without
//! `recommendations` the report gets rule-based advice from the deltas.

use costwatch_core::assembler::{ReportHeader, assemble};
use costwatch_core::breakdown::{change_percent, service_deltas};
use costwatch_core::error::{CostwatchError, Result};
use costwatch_core::normalizer::normalize_unused_resources;
use costwatch_core::recommendations::recommendations;
use costwatch_core::types::WeeklyReport;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Raw input for a locally composed report
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeInput {
    /// Human-readable period label
    pub period: String,
    /// Cost per service for the reported week
    #[serde(default)]
    pub current_costs: HashMap<String, f64>,
    /// Cost per service for the week before
    #[serde(default)]
    pub previous_costs: HashMap<String, f64>,
    /// Unused resource rows in upstream shape
    #[serde(default)]
    pub unused_resources: Value,
    /// Free-text recommendations
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Savings override
    pub potential_savings: Option<f64>,
    /// Resource count override
    pub resource_count: Option<u64>,
}

impl ComposeInput {
    /// Parse an input document
    pub fn from_json(text: &str) -> Result<Self> {
        let input: ComposeInput = serde_json::from_str(text)?;
        if input.period.trim().is_empty() {
            return Err(CostwatchError::InvalidArgument(
                "compose input has an empty period".to_string(),
            ));
        }
        Ok(input)
    }

    /// Read and parse an input file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json(&text)
    }
}

/// Build a weekly report from raw cost maps
pub fn compose_report(input: ComposeInput) -> WeeklyReport {
    let breakdown = service_deltas(&input.current_costs, &input.previous_costs);
    let unused = if input.unused_resources.is_null() {
        Vec::new()
    } else {
        normalize_unused_resources(&input.unused_resources)
    };

    let total_cost: f64 = input.current_costs.values().sum();
    let previous_total: f64 = input.previous_costs.values().sum();
    let potential_savings = input
        .potential_savings
        .unwrap_or_else(|| unused.iter().map(|r| r.monthly_savings).sum());
    let resource_count = input.resource_count.unwrap_or(unused.len() as u64);
    let weekly_change_percent = change_percent(total_cost, previous_total);
    let recommendations = if input.recommendations.is_empty() {
        recommendations(&breakdown, total_cost - previous_total, weekly_change_percent)
    } else {
        input.recommendations
    };

    info!(
        "Composed report for {} ({} services, {} unused resources)",
        input.period,
        breakdown.len(),
        unused.len()
    );

    assemble(
        ReportHeader {
            period: input.period,
            total_cost,
            weekly_change_percent,
            potential_savings,
            resource_count,
        },
        breakdown,
        unused,
        recommendations,
    )
}
