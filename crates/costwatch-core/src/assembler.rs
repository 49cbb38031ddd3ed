//! Weekly report assembly
//!
//! The assembler composes a [`WeeklyReport`] from data that has already been
//! fetched. It derives nothing: `potential_savings`, `resource_count` and each
//! row's `change_percent` are carried over exactly as supplied, even when they
//! disagree with the lists next to them.

use crate::error::{CostwatchError, Result};
use crate::normalizer::{Numeric, normalize_unused_resource};
use crate::types::{CostBreakdownRow, ReportResource, UnusedResource, WeeklyReport};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Scalar fields of a weekly report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportHeader {
    /// Human-readable period label
    pub period: String,
    /// Total cost in USD
    pub total_cost: f64,
    /// Week-over-week change in percent
    pub weekly_change_percent: f64,
    /// Estimated savings in USD
    pub potential_savings: f64,
    /// Number of resources covered
    pub resource_count: u64,
}

/// Compose a weekly report
///
/// Unused resources without a region get "Global". Order of every list is
/// preserved.
///
/// # Examples
/// ```
/// use costwatch_core::assembler::{ReportHeader, assemble};
/// use costwatch_core::types::UnusedResource;
///
/// let report = assemble(
///     ReportHeader {
///         period: "Oct 7 - Oct 13, 2024".into(),
///         potential_savings: 500.0,
///         ..Default::default()
///     },
///     vec![],
///     vec![UnusedResource {
///         id: "eip-1".into(),
///         resource_type: "Elastic IP".into(),
///         region: None,
///         monthly_savings: 3.6,
///         recommendation: None,
///     }],
///     vec!["Release idle addresses".into()],
/// );
///
/// // Pass-through: not the sum of the listed savings
/// assert_eq!(report.potential_savings, 500.0);
/// assert_eq!(report.unused_resources[0].region, "Global");
/// ```
pub fn assemble(
    header: ReportHeader,
    cost_breakdown: Vec<CostBreakdownRow>,
    unused_resources: Vec<UnusedResource>,
    recommendations: Vec<String>,
) -> WeeklyReport {
    WeeklyReport {
        period: header.period,
        total_cost: header.total_cost,
        weekly_change_percent: header.weekly_change_percent,
        potential_savings: header.potential_savings,
        resource_count: header.resource_count,
        cost_breakdown,
        unused_resources: unused_resources
            .into_iter()
            .map(ReportResource::from)
            .collect(),
        recommendations,
    }
}

/// Breakdown row as sent by the reports API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBreakdownRow {
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    current_cost: Option<Numeric>,
    #[serde(default)]
    previous_cost: Option<Numeric>,
    #[serde(default)]
    change_percent: Option<Numeric>,
    #[serde(default)]
    change: Option<Numeric>,
}

impl From<RawBreakdownRow> for CostBreakdownRow {
    fn from(raw: RawBreakdownRow) -> Self {
        let value = |n: Option<Numeric>| n.as_ref().and_then(Numeric::value);
        Self {
            service: raw.service.unwrap_or_default(),
            current_cost: value(raw.current_cost).unwrap_or(0.0).max(0.0),
            previous_cost: value(raw.previous_cost).unwrap_or(0.0).max(0.0),
            change_percent: value(raw.change_percent)
                .or_else(|| value(raw.change))
                .unwrap_or(0.0),
        }
    }
}

/// Weekly report payload as sent by the reports API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeeklyReportPayload {
    period: String,
    #[serde(default)]
    total_cost: Option<Numeric>,
    #[serde(default)]
    weekly_change_percent: Option<Numeric>,
    #[serde(default)]
    weekly_change: Option<Numeric>,
    #[serde(default)]
    potential_savings: Option<Numeric>,
    #[serde(default)]
    resource_count: Option<Numeric>,
    #[serde(default)]
    cost_breakdown: Option<Vec<Value>>,
    #[serde(default)]
    unused_resources: Option<Vec<Value>>,
    #[serde(default)]
    recommendations: Option<Vec<Value>>,
}

/// Assemble a weekly report from a reports API payload
///
/// Accepts `weeklyChange`/`change` as well as the `...Percent` spellings.
///
/// # Errors
///
/// Returns [`CostwatchError::MalformedPayload`] when the body is not an
/// object with a `period` label.
pub fn assemble_from_payload(payload: &Value) -> Result<WeeklyReport> {
    // Derived struct decoding would also fill fields from an array by position.
    if !payload.is_object() {
        return Err(CostwatchError::MalformedPayload(
            "weekly report body is not an object".to_string(),
        ));
    }
    let raw = WeeklyReportPayload::deserialize(payload)
        .map_err(|e| CostwatchError::MalformedPayload(format!("weekly report: {e}")))?;
    let value = |n: Option<Numeric>| n.as_ref().and_then(Numeric::value);

    let header = ReportHeader {
        period: raw.period,
        total_cost: value(raw.total_cost).unwrap_or(0.0),
        weekly_change_percent: value(raw.weekly_change_percent)
            .or_else(|| value(raw.weekly_change))
            .unwrap_or(0.0),
        potential_savings: value(raw.potential_savings).unwrap_or(0.0),
        resource_count: value(raw.resource_count)
            .map(|n| n.max(0.0).round() as u64)
            .unwrap_or(0),
    };

    let cost_breakdown: Vec<CostBreakdownRow> = raw
        .cost_breakdown
        .unwrap_or_default()
        .iter()
        .filter(|row| row.is_object())
        .map(|row| {
            RawBreakdownRow::deserialize(row)
                .unwrap_or_default()
                .into()
        })
        .collect();
    let unused_resources: Vec<UnusedResource> = raw
        .unused_resources
        .unwrap_or_default()
        .iter()
        .filter(|row| row.is_object())
        .map(normalize_unused_resource)
        .collect();
    let recommendations: Vec<String> = raw
        .recommendations
        .unwrap_or_default()
        .into_iter()
        .filter_map(|rec| match rec {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect();

    debug!(
        "Assembled report '{}' with {} rows, {} resources, {} recommendations",
        header.period,
        cost_breakdown.len(),
        unused_resources.len(),
        recommendations.len()
    );

    Ok(assemble(
        header,
        cost_breakdown,
        unused_resources,
        recommendations,
    ))
}
