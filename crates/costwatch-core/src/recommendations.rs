//! Rule-based cost recommendations
//!
//! Produces advice lines from week-over-week service deltas when a report is
//! composed without recommendations of its own.

use crate::types::CostBreakdownRow;

/// Total week-over-week increase, in percent, that triggers a spending alert
pub const SPIKE_PERCENT: f64 = 20.0;

/// Minimum dollar increase for a service to be considered
pub const SERVICE_DELTA_USD: f64 = 5.0;

/// Minimum percent increase for a service to be considered
pub const SERVICE_CHANGE_PERCENT: f64 = 20.0;

/// Number of increased services examined
pub const MAX_SERVICES: usize = 3;

/// Upper bound on returned lines
pub const MAX_RECOMMENDATIONS: usize = 5;

fn service_advice(service: &str) -> Option<(&'static str, &'static str)> {
    if service.contains("EC2") {
        Some((
            "EC2",
            "Consider using Reserved Instances or Spot Instances for predictable workloads.",
        ))
    } else if service.contains("S3") || service.contains("Simple Storage Service") {
        Some((
            "S3",
            "Enable Intelligent-Tiering and implement lifecycle policies.",
        ))
    } else if service.contains("RDS") {
        Some((
            "RDS",
            "Review instance sizes and consider Aurora Serverless for variable workloads.",
        ))
    } else if service.contains("Lambda") {
        Some((
            "Lambda",
            "Optimize function memory allocation and execution time.",
        ))
    } else {
        None
    }
}

/// Advice lines for a week's breakdown
///
/// `rows` are expected in report order (highest current cost first). The
/// first [`MAX_SERVICES`] rows whose increase exceeds both service thresholds
/// are examined; only EC2, S3, RDS and Lambda have advice, so other services
/// in that window produce nothing.
///
/// # Examples
/// ```
/// use costwatch_core::recommendations::recommendations;
/// use costwatch_core::types::CostBreakdownRow;
///
/// let rows = vec![CostBreakdownRow {
///     service: "Amazon RDS".into(),
///     current_cost: 300.0,
///     previous_cost: 200.0,
///     change_percent: 50.0,
/// }];
/// let lines = recommendations(&rows, 100.0, 50.0);
/// assert_eq!(lines.len(), 2);
/// assert!(lines[1].starts_with("RDS costs increased by $100.00."));
/// ```
pub fn recommendations(
    rows: &[CostBreakdownRow],
    total_delta: f64,
    total_change_percent: f64,
) -> Vec<String> {
    let mut lines = Vec::new();

    if total_delta > 0.0 && total_change_percent > SPIKE_PERCENT {
        lines.push(format!(
            "Your spending increased by {total_change_percent:.1}% this week. \
             Review your usage patterns to identify unexpected costs."
        ));
    }

    let increased = rows.iter().filter(|row| {
        row.current_cost - row.previous_cost > SERVICE_DELTA_USD
            && row.change_percent > SERVICE_CHANGE_PERCENT
    });
    for row in increased.take(MAX_SERVICES) {
        if let Some((name, advice)) = service_advice(&row.service) {
            let delta = row.current_cost - row.previous_cost;
            lines.push(format!("{name} costs increased by ${delta:.2}. {advice}"));
        }
    }

    lines.truncate(MAX_RECOMMENDATIONS);
    lines
}
