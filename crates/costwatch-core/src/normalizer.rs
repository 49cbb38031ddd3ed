//! Upstream payload normalization
//!
//! The cost API has shipped two payload shapes over time:
//!
//! - legacy: `{ total, periodStart, periodEnd, weeklyDeltaPercent, byTag: [{tag, cost}] }`
//! - current: `{ totalCost, periodStart, periodEnd, trend, byService: [{service, cost}] }`
//!
//! Each shape is decoded into its own record and converted once into a
//! [`PartialSummary`]. The two partials are merged field by field, current
//! shape first. Missing values become safe defaults; only a missing or
//! unreadable period timestamp is an error.

use crate::error::{CostwatchError, Result};
use crate::types::{BreakdownEntry, CostSummary, TrendSource, UnusedResource};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// A number that upstream may send as a JSON number or as text
///
/// Text such as `"+5.2%"` or `"$12.40"` is accepted; anything else decodes
/// but yields no value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// JSON number
    Number(f64),
    /// Numeric text
    Text(String),
    /// Any other JSON value
    Other(Value),
}

impl Numeric {
    /// Numeric value, if there is one
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s
                .trim()
                .trim_end_matches('%')
                .trim_start_matches('+')
                .replacen('$', "", 1)
                .replace(',', "")
                .trim()
                .parse::<f64>()
                .ok(),
            Self::Other(_) => None,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Decode a list leniently: non-arrays become `None`, bad items are skipped
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Decode a string leniently: numbers are stringified, other values dropped
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Costs are never negative
fn cost_or_zero(value: Option<&Numeric>) -> f64 {
    value.and_then(Numeric::value).unwrap_or(0.0).max(0.0)
}

/// Period fields shared by both shapes
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeriodFields {
    #[serde(default, deserialize_with = "lenient_string")]
    period_start: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    period_end: Option<String>,
}

/// `{ tag, cost }` item of the legacy breakdown
#[derive(Debug, Default, Deserialize)]
struct TagCost {
    #[serde(default, deserialize_with = "lenient_string")]
    tag: Option<String>,
    #[serde(default)]
    cost: Option<Numeric>,
}

/// `{ service, cost }` item of the current breakdown
#[derive(Debug, Default, Deserialize)]
struct ServiceCost {
    #[serde(default, deserialize_with = "lenient_string")]
    service: Option<String>,
    #[serde(default)]
    cost: Option<Numeric>,
}

/// Legacy payload shape
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyShape {
    #[serde(default)]
    total: Option<Numeric>,
    #[serde(default)]
    weekly_delta_percent: Option<Numeric>,
    #[serde(default, deserialize_with = "lenient_list")]
    by_tag: Option<Vec<TagCost>>,
}

/// Current payload shape
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentShape {
    #[serde(default)]
    total_cost: Option<Numeric>,
    #[serde(default)]
    trend: Option<Numeric>,
    #[serde(default, deserialize_with = "lenient_list")]
    by_service: Option<Vec<ServiceCost>>,
}

/// Summary fields contributed by a single payload shape
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartialSummary {
    /// Total cost, if the shape carried a usable one
    pub total_cost: Option<f64>,
    /// Trend value and the field it came from
    pub trend: Option<(f64, TrendSource)>,
    /// Breakdown, if the shape carried a collection
    pub breakdown: Option<Vec<BreakdownEntry>>,
}

impl PartialSummary {
    /// Merge field by field, keeping `self` where it has a value
    pub fn or(self, fallback: PartialSummary) -> PartialSummary {
        PartialSummary {
            total_cost: self.total_cost.or(fallback.total_cost),
            trend: self.trend.or(fallback.trend),
            breakdown: self.breakdown.or(fallback.breakdown),
        }
    }
}

impl From<LegacyShape> for PartialSummary {
    fn from(shape: LegacyShape) -> Self {
        Self {
            total_cost: shape
                .total
                .as_ref()
                .and_then(Numeric::value)
                .map(|v| v.max(0.0)),
            trend: shape
                .weekly_delta_percent
                .as_ref()
                .and_then(Numeric::value)
                .map(|v| (v, TrendSource::WeeklyChange)),
            breakdown: shape.by_tag.map(|items| {
                items
                    .into_iter()
                    .map(|item| {
                        BreakdownEntry::new(
                            item.tag.unwrap_or_default(),
                            cost_or_zero(item.cost.as_ref()),
                        )
                    })
                    .collect()
            }),
        }
    }
}

impl From<CurrentShape> for PartialSummary {
    fn from(shape: CurrentShape) -> Self {
        Self {
            total_cost: shape
                .total_cost
                .as_ref()
                .and_then(Numeric::value)
                .map(|v| v.max(0.0)),
            // A present but non-numeric trend such as "N/A" still wins, as 0.
            trend: shape
                .trend
                .map(|t| (t.value().unwrap_or(0.0), TrendSource::Trend)),
            breakdown: shape.by_service.map(|items| {
                items
                    .into_iter()
                    .map(|item| {
                        BreakdownEntry::new(
                            item.service.unwrap_or_default(),
                            cost_or_zero(item.cost.as_ref()),
                        )
                    })
                    .collect()
            }),
        }
    }
}

/// Parse an upstream timestamp
///
/// Accepts RFC 3339 (`2024-10-01T00:00:00Z`), a naive date-time, or a bare
/// date, which is taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

fn required_timestamp(value: Option<String>, field: &'static str) -> Result<DateTime<Utc>> {
    let raw = value.ok_or(CostwatchError::MissingField(field))?;
    parse_timestamp(&raw).ok_or_else(|| CostwatchError::InvalidDate(format!("{field}: {raw}")))
}

/// Normalize a cost summary payload of either shape
///
/// # Errors
///
/// Returns [`CostwatchError::MalformedPayload`] when the body is not a JSON
/// object. Otherwise fails only when `periodStart`/`periodEnd` is missing or
/// unreadable, or when start is after end.
///
/// # Examples
/// ```
/// use costwatch_core::normalizer::normalize_cost_summary;
/// use serde_json::json;
///
/// let summary = normalize_cost_summary(&json!({
///     "totalCost": 1247.85,
///     "periodStart": "2024-10-01",
///     "periodEnd": "2024-10-08",
///     "trend": -12.5,
///     "byService": [{ "service": "EC2", "cost": 487.20 }]
/// }))
/// .unwrap();
///
/// assert_eq!(summary.total_cost, 1247.85);
/// assert_eq!(summary.trend_percent, -12.5);
/// assert_eq!(summary.trend_label(), "Trend");
/// assert_eq!(summary.breakdown[0].label, "EC2");
/// ```
pub fn normalize_cost_summary(payload: &Value) -> Result<CostSummary> {
    // Derived struct decoding would also fill fields from an array by position.
    if !payload.is_object() {
        return Err(CostwatchError::MalformedPayload(
            "cost summary body is not an object".to_string(),
        ));
    }
    let period = PeriodFields::deserialize(payload).unwrap_or_default();
    let current: PartialSummary = CurrentShape::deserialize(payload)
        .unwrap_or_default()
        .into();
    let legacy: PartialSummary = LegacyShape::deserialize(payload)
        .unwrap_or_default()
        .into();
    let merged = current.or(legacy);

    let period_start = required_timestamp(period.period_start, "periodStart")?;
    let period_end = required_timestamp(period.period_end, "periodEnd")?;
    if period_start > period_end {
        return Err(CostwatchError::InvalidPeriod {
            start: period_start.to_rfc3339(),
            end: period_end.to_rfc3339(),
        });
    }

    let (trend_percent, trend_source) = merged.trend.unwrap_or((0.0, TrendSource::WeeklyChange));
    let breakdown = merged.breakdown.unwrap_or_default();
    debug!(
        "Normalized cost summary with {} breakdown entries ({})",
        breakdown.len(),
        trend_source
    );

    Ok(CostSummary {
        total_cost: merged.total_cost.unwrap_or(0.0),
        period_start,
        period_end,
        trend_percent,
        trend_source,
        breakdown,
    })
}

/// Unused resource row, accepting both the finder's and the report's field names
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUnusedResource {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    resource_type: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    region: Option<String>,
    #[serde(default)]
    monthly_savings: Option<Numeric>,
    #[serde(default)]
    estimated_monthly_savings_usd: Option<Numeric>,
    #[serde(default, deserialize_with = "lenient_string")]
    recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    details: Option<String>,
}

impl From<RawUnusedResource> for UnusedResource {
    fn from(raw: RawUnusedResource) -> Self {
        let savings = raw
            .monthly_savings
            .as_ref()
            .and_then(Numeric::value)
            .or_else(|| {
                raw.estimated_monthly_savings_usd
                    .as_ref()
                    .and_then(Numeric::value)
            });
        Self {
            id: raw.id.unwrap_or_default(),
            resource_type: raw.resource_type.or(raw.kind).unwrap_or_default(),
            region: raw.region.filter(|r| !r.trim().is_empty()),
            monthly_savings: savings.unwrap_or(0.0).max(0.0),
            recommendation: raw
                .recommendation
                .or(raw.details)
                .filter(|r| !r.trim().is_empty()),
        }
    }
}

/// Normalize a single unused-resource row
pub fn normalize_unused_resource(row: &Value) -> UnusedResource {
    RawUnusedResource::deserialize(row)
        .unwrap_or_default()
        .into()
}

/// Normalize an unused-resource listing
///
/// Accepts a bare array or an object wrapping it in `unusedResources` or
/// `resources`. Anything else yields an empty list. Non-object rows are
/// skipped; duplicates by id are kept.
pub fn normalize_unused_resources(payload: &Value) -> Vec<UnusedResource> {
    let rows = match payload {
        Value::Array(rows) => Some(rows),
        Value::Object(map) => map
            .get("unusedResources")
            .or_else(|| map.get("resources"))
            .and_then(Value::as_array),
        _ => None,
    };

    rows.map(|rows| {
        rows.iter()
            .filter(|row| row.is_object())
            .map(normalize_unused_resource)
            .collect()
    })
    .unwrap_or_default()
}
