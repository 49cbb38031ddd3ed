//! Core domain types for costwatch
//!
//! These are the canonical, render-ready records produced by the normalizer
//! and the report assembler. Upstream wire shapes live in
//! [`crate::normalizer`]; nothing here knows about field-name variations.

use crate::error::{CostwatchError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Region shown for resources that upstream reports without one
pub const GLOBAL_REGION: &str = "Global";

/// One `(label, cost)` entry of a cost summary breakdown
///
/// The label is a cost-allocation tag or a service name depending on which
/// upstream source produced the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// Tag or service name
    pub label: String,
    /// Cost in USD, never negative
    pub cost: f64,
}

impl BreakdownEntry {
    /// Create a new breakdown entry
    pub fn new(label: impl Into<String>, cost: f64) -> Self {
        Self {
            label: label.into(),
            cost,
        }
    }
}

/// Which upstream field supplied the trend percentage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendSource {
    /// The `trend` field of the current payload shape
    Trend,
    /// The `weeklyDeltaPercent` field of the legacy shape, or nothing at all
    #[default]
    WeeklyChange,
}

impl TrendSource {
    /// Display label for the trend metric
    pub fn label(&self) -> &'static str {
        match self {
            Self::Trend => "Trend",
            Self::WeeklyChange => "Weekly Change",
        }
    }
}

impl fmt::Display for TrendSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classification of a cost change
///
/// Costs going down is the good outcome, so a negative change is
/// favorable and anything else, including zero, is unfavorable.
///
/// # Examples
/// ```
/// use costwatch_core::types::Polarity;
///
/// assert_eq!(Polarity::from_change(-12.5), Polarity::Favorable);
/// assert_eq!(Polarity::from_change(0.0), Polarity::Unfavorable);
/// assert_eq!(Polarity::from_change(3.0).css_class(), "unfavorable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Polarity {
    /// Cost went down
    Favorable,
    /// Cost went up or stayed flat
    Unfavorable,
}

impl Polarity {
    /// Classify a percentage change
    pub fn from_change(change_percent: f64) -> Self {
        if change_percent < 0.0 {
            Self::Favorable
        } else {
            Self::Unfavorable
        }
    }

    /// Style class used by rendered documents
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Favorable => "favorable",
            Self::Unfavorable => "unfavorable",
        }
    }
}

/// Point-in-time snapshot of spend
///
/// Built fresh on every fetch. `breakdown` is displayed as given and is never
/// re-summed against `total_cost`, since upstream may omit untagged spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    /// Total cost in USD
    pub total_cost: f64,
    /// Start of the reporting period
    pub period_start: DateTime<Utc>,
    /// End of the reporting period
    pub period_end: DateTime<Utc>,
    /// Percent change against the prior comparable period
    pub trend_percent: f64,
    /// Field that supplied `trend_percent`
    pub trend_source: TrendSource,
    /// Spend per tag or service, in upstream order
    pub breakdown: Vec<BreakdownEntry>,
}

impl CostSummary {
    /// Label to show next to the trend value
    pub fn trend_label(&self) -> &'static str {
        self.trend_source.label()
    }

    /// Classification of the trend value
    pub fn trend_polarity(&self) -> Polarity {
        Polarity::from_change(self.trend_percent)
    }
}

/// A single cost-saving opportunity
///
/// Entries are never deduplicated by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedResource {
    /// Opaque resource identifier
    pub id: String,
    /// Kind of resource, e.g. "EBS Volume"
    pub resource_type: String,
    /// Region, absent for global resources
    pub region: Option<String>,
    /// Estimated monthly savings in USD
    pub monthly_savings: f64,
    /// Suggested action
    pub recommendation: Option<String>,
}

impl UnusedResource {
    /// Region for display, "Global" when absent
    pub fn region_or_global(&self) -> &str {
        self.region.as_deref().unwrap_or(GLOBAL_REGION)
    }
}

/// One service row of a weekly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdownRow {
    /// Service or tag name
    pub service: String,
    /// Cost for the current week
    pub current_cost: f64,
    /// Cost for the previous week
    pub previous_cost: f64,
    /// Percent change, as supplied upstream
    pub change_percent: f64,
}

impl CostBreakdownRow {
    /// Classification of this row's change
    pub fn polarity(&self) -> Polarity {
        Polarity::from_change(self.change_percent)
    }
}

/// An unused resource as it appears in a weekly report, region resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResource {
    /// Opaque resource identifier
    pub id: String,
    /// Kind of resource
    pub resource_type: String,
    /// Region, "Global" when upstream had none
    pub region: String,
    /// Estimated monthly savings in USD
    pub monthly_savings: f64,
    /// Suggested action
    pub recommendation: Option<String>,
}

impl From<UnusedResource> for ReportResource {
    fn from(resource: UnusedResource) -> Self {
        Self {
            region: resource
                .region
                .unwrap_or_else(|| GLOBAL_REGION.to_string()),
            id: resource.id,
            resource_type: resource.resource_type,
            monthly_savings: resource.monthly_savings,
            recommendation: resource.recommendation,
        }
    }
}

/// Assembled, renderable weekly report
///
/// `potential_savings`, `resource_count` and each row's `change_percent` are
/// taken verbatim from upstream and are not reconciled with the lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
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
    /// Per-service rows in upstream order
    pub cost_breakdown: Vec<CostBreakdownRow>,
    /// Optimization opportunities in upstream order
    pub unused_resources: Vec<ReportResource>,
    /// Free-text recommendations, rendered verbatim
    pub recommendations: Vec<String>,
}

impl WeeklyReport {
    /// Classification of the weekly change
    pub fn weekly_polarity(&self) -> Polarity {
        Polarity::from_change(self.weekly_change_percent)
    }
}

/// Budget alert subscription request
///
/// Validated at submission time and forwarded; nothing is stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSubscription {
    /// Budget to watch
    pub budget_id: String,
    /// Address that receives alerts
    pub email: String,
    /// Alert threshold in percent of the budget
    pub threshold_percent: f64,
}

impl BudgetSubscription {
    /// Build a subscription from user-entered text, validating it
    ///
    /// # Examples
    /// ```
    /// use costwatch_core::types::BudgetSubscription;
    ///
    /// let sub = BudgetSubscription::parse("monthly-ops", "ops@example.com", "80").unwrap();
    /// assert_eq!(sub.threshold_percent, 80.0);
    ///
    /// assert!(BudgetSubscription::parse("monthly-ops", "ops@example.com", "-5").is_err());
    /// assert!(BudgetSubscription::parse("monthly-ops", "ops@example.com", "lots").is_err());
    /// ```
    pub fn parse(budget_id: &str, email: &str, threshold: &str) -> Result<Self> {
        let threshold_percent: f64 = threshold.trim().parse().map_err(|_| {
            CostwatchError::Validation(format!("threshold must be a number, got '{threshold}'"))
        })?;
        let subscription = Self {
            budget_id: budget_id.trim().to_string(),
            email: email.trim().to_string(),
            threshold_percent,
        };
        subscription.validate()?;
        Ok(subscription)
    }

    /// Check the request before it is sent anywhere
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_percent.is_finite() || self.threshold_percent <= 0.0 {
            return Err(CostwatchError::Validation(format!(
                "threshold must be greater than 0, got {}",
                self.threshold_percent
            )));
        }
        if self.budget_id.is_empty() {
            return Err(CostwatchError::Validation(
                "budget id must not be empty".to_string(),
            ));
        }
        validate_email(&self.email)
    }
}

/// Request for an on-demand weekly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportRequest {
    /// First day covered
    pub start_date: NaiveDate,
    /// Last day covered
    pub end_date: NaiveDate,
    /// Optional delivery address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl WeeklyReportRequest {
    /// Check the request before it is sent anywhere
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(CostwatchError::Validation(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        match &self.email {
            Some(email) => validate_email(email),
            None => Ok(()),
        }
    }
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CostwatchError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}
