//! Dashboard snapshot document
//!
//! A static HTML view of the dashboard: total cost, trend, the breakdown
//! donut with its legend, and the unused resource list.

use crate::chart::{donut_segments, render_donut_svg};
use crate::format::{format_currency, format_percent, format_timestamp, html_escape};
use chrono::{DateTime, Utc};
use costwatch_core::types::{CostSummary, UnusedResource};

const DASHBOARD_CSS: &str = r#"
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; color: #e6f1ff; background: #0a192f; padding: 24px; }
h1, h2 { color: #64ffda; }
.metrics-grid { display: flex; gap: 20px; margin-bottom: 24px; }
.metric-card { background: #112240; border-radius: 8px; padding: 20px; min-width: 200px; }
.metric-value { font-size: 28px; font-weight: bold; }
.metric-label { color: #8892b0; }
.favorable { color: #00ff88; }
.unfavorable { color: #ff4757; }
.chart-grid { display: flex; gap: 32px; align-items: center; }
.legend-item { display: flex; gap: 8px; align-items: center; margin-bottom: 6px; }
.legend-swatch { width: 12px; height: 12px; border-radius: 2px; display: inline-block; }
.no-data { color: #8892b0; font-style: italic; }
.resource { background: #112240; border-radius: 6px; padding: 12px; margin-bottom: 8px; }
.footer { color: #8892b0; font-size: 12px; margin-top: 32px; }
"#;

/// Render a dashboard snapshot as a self-contained HTML document
pub fn render_dashboard(
    summary: &CostSummary,
    unused_resources: &[UnusedResource],
    generated_at: &DateTime<Utc>,
) -> String {
    let polarity = summary.trend_polarity().css_class();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Cost Dashboard</title>
<style>{css}</style>
</head>
<body>
<h1>Cost Dashboard</h1>
<p>Period: {start} to {end}</p>
<div class="metrics-grid">
<div class="metric-card"><div class="metric-value">{total}</div><div class="metric-label">Total Cost</div></div>
<div class="metric-card"><div class="metric-value {polarity}">{trend}</div><div class="metric-label">{trend_label}</div></div>
</div>
<h2>Cost Breakdown</h2>
{chart}
<h2>Unused Resources</h2>
{resources}
<div class="footer">Snapshot taken {generated}</div>
</body>
</html>
"#,
        css = DASHBOARD_CSS,
        start = summary.period_start.format("%Y-%m-%d"),
        end = summary.period_end.format("%Y-%m-%d"),
        total = format_currency(summary.total_cost),
        trend = format_percent(summary.trend_percent),
        trend_label = summary.trend_label(),
        chart = render_chart(summary),
        resources = render_resources(unused_resources),
        generated = format_timestamp(generated_at),
    )
}

fn render_chart(summary: &CostSummary) -> String {
    if summary.breakdown.is_empty() {
        return r#"<div class="no-data">No cost data available</div>"#.to_string();
    }

    let segments = donut_segments(&summary.breakdown);
    let legend: Vec<String> = segments
        .iter()
        .map(|segment| {
            format!(
                r#"<div class="legend-item"><span class="legend-swatch" style="background: {color}"></span>{label} {cost} ({percent:.1}%)</div>"#,
                color = segment.color,
                label = html_escape(&segment.label),
                cost = format_currency(segment.cost),
                percent = segment.percent,
            )
        })
        .collect();

    format!(
        "<div class=\"chart-grid\">\n{svg}\n<div class=\"chart-legend\">\n{legend}\n</div>\n</div>",
        svg = render_donut_svg(&segments),
        legend = legend.join("\n"),
    )
}

fn render_resources(resources: &[UnusedResource]) -> String {
    if resources.is_empty() {
        return r#"<div class="no-data">No unused resources found</div>"#.to_string();
    }
    resources
        .iter()
        .map(|resource| {
            format!(
                r#"<div class="resource"><strong>{kind}</strong> {id} ({region}) - {savings}/mo{details}</div>"#,
                kind = html_escape(&resource.resource_type),
                id = html_escape(&resource.id),
                region = html_escape(resource.region_or_global()),
                savings = format_currency(resource.monthly_savings),
                details = resource
                    .recommendation
                    .as_deref()
                    .map(|r| format!(": {}", html_escape(r)))
                    .unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
