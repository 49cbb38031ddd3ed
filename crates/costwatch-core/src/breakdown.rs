//! Week-over-week service deltas
//!
//! Builds report breakdown rows from raw per-service cost maps for two
//! periods. This is where `change_percent` values come from when a report is
//! composed locally; the assembler itself never recomputes them.

use crate::types::CostBreakdownRow;
use std::collections::{BTreeSet, HashMap};

/// Services below this amount in both periods are left out
pub const MIN_REPORTED_COST: f64 = 0.01;

/// Percent change from `previous` to `current`, 0 when there is no baseline
///
/// # Examples
/// ```
/// use costwatch_core::breakdown::change_percent;
///
/// assert_eq!(change_percent(120.0, 100.0), 20.0);
/// assert_eq!(change_percent(50.0, 0.0), 0.0);
/// ```
pub fn change_percent(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Build breakdown rows from two per-service cost maps
///
/// Every service seen in either period is considered. Rows are sorted by
/// current cost, highest first, with ties broken by service name.
pub fn service_deltas(
    current: &HashMap<String, f64>,
    previous: &HashMap<String, f64>,
) -> Vec<CostBreakdownRow> {
    let services: BTreeSet<&String> = current.keys().chain(previous.keys()).collect();

    let mut rows: Vec<CostBreakdownRow> = services
        .into_iter()
        .filter_map(|service| {
            let current_cost = current.get(service).copied().unwrap_or(0.0);
            let previous_cost = previous.get(service).copied().unwrap_or(0.0);
            if current_cost <= MIN_REPORTED_COST && previous_cost <= MIN_REPORTED_COST {
                return None;
            }
            Some(CostBreakdownRow {
                service: service.clone(),
                current_cost,
                previous_cost,
                change_percent: change_percent(current_cost, previous_cost),
            })
        })
        .collect();

    // BTreeSet order plus a stable sort keeps equal costs alphabetical.
    rows.sort_by(|a, b| b.current_cost.total_cmp(&a.current_cost));
    rows
}
