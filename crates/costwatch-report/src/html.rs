//! Weekly report document rendering
//!
//! Renders a [`WeeklyReport`] as a single self-contained HTML document meant
//! to be opened and printed to PDF. Styles are inline and nothing external is
//! referenced, so the document renders the same offline.
//!
//! Output is a pure function of the report and the generation timestamp.

use crate::format::{format_currency, format_percent, format_timestamp, html_escape};
use chrono::{DateTime, Utc};
use costwatch_core::types::{CostBreakdownRow, ReportResource, WeeklyReport};

/// Shown for resources that came without a recommendation
pub const NO_RECOMMENDATION: &str = "No recommendation provided";

const REPORT_CSS: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; background: white; padding: 20px; }
.header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #0066cc; padding-bottom: 20px; }
.header h1 { color: #0066cc; font-size: 28px; margin-bottom: 5px; }
.header p { color: #666; font-size: 16px; }
.summary-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 30px; }
.summary-card { background: #f8f9fa; border: 1px solid #e9ecef; border-radius: 8px; padding: 20px; text-align: center; }
.summary-value { font-size: 24px; font-weight: bold; color: #0066cc; margin-bottom: 5px; }
.summary-label { font-size: 14px; color: #666; }
.favorable { color: #28a745 !important; }
.unfavorable { color: #dc3545 !important; }
.section { margin-bottom: 30px; }
.section h2 { color: #333; margin-bottom: 15px; font-size: 20px; border-left: 4px solid #0066cc; padding-left: 10px; }
.cost-table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
.cost-table th, .cost-table td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
.cost-table th { background-color: #0066cc; color: white; font-weight: 600; }
.cost-table tr:nth-child(even) { background-color: #f8f9fa; }
.resource-item { background: #fff; border: 1px solid #e9ecef; border-radius: 6px; padding: 15px; margin-bottom: 10px; }
.resource-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px; }
.resource-type { font-weight: bold; color: #0066cc; }
.savings { color: #28a745; font-weight: bold; }
.empty { color: #666; font-style: italic; }
.recommendations { padding-left: 20px; }
.recommendations li { margin-bottom: 8px; }
.footer { text-align: center; margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; color: #666; font-size: 12px; }
@media print { body { padding: 0; } }
"#;

/// Render a weekly report as a self-contained HTML document
///
/// Sections appear in a fixed order: title, summary metrics, cost breakdown,
/// unused resources, recommendations, footer. Lists keep their input order.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use costwatch_core::fallback;
/// use costwatch_report::html::render_report;
///
/// let report = fallback::weekly_report();
/// let generated_at = Utc.with_ymd_and_hms(2024, 10, 14, 9, 0, 0).unwrap();
///
/// let first = render_report(&report, &generated_at);
/// let second = render_report(&report, &generated_at);
/// assert_eq!(first, second);
/// assert!(first.starts_with("<!DOCTYPE html>"));
/// ```
pub fn render_report(report: &WeeklyReport, generated_at: &DateTime<Utc>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>AWS Cost Report - {period}</title>
<style>{css}</style>
</head>
<body>
{header}
{summary}
{breakdown}
{resources}
{recommendations}
{footer}
</body>
</html>
"#,
        period = html_escape(&report.period),
        css = REPORT_CSS,
        header = render_header(report, generated_at),
        summary = render_summary(report),
        breakdown = render_breakdown(&report.cost_breakdown),
        resources = render_resources(&report.unused_resources),
        recommendations = render_recommendations(&report.recommendations),
        footer = render_footer(),
    )
}

fn render_header(report: &WeeklyReport, generated_at: &DateTime<Utc>) -> String {
    format!(
        r#"<div class="header">
<h1>AWS Cost Optimization Report</h1>
<p>Generated on {generated} | Period: {period}</p>
</div>"#,
        generated = format_timestamp(generated_at),
        period = html_escape(&report.period),
    )
}

fn summary_card(value: &str, label: &str, class: Option<&str>) -> String {
    let class = match class {
        Some(extra) => format!("summary-value {extra}"),
        None => "summary-value".to_string(),
    };
    format!(
        r#"<div class="summary-card">
<div class="{class}">{value}</div>
<div class="summary-label">{label}</div>
</div>"#
    )
}

fn render_summary(report: &WeeklyReport) -> String {
    let cards = [
        summary_card(&format_currency(report.total_cost), "Total Cost", None),
        summary_card(
            &format_percent(report.weekly_change_percent),
            "Weekly Change",
            Some(report.weekly_polarity().css_class()),
        ),
        summary_card(
            &format_currency(report.potential_savings),
            "Potential Savings",
            None,
        ),
        summary_card(&report.resource_count.to_string(), "Total Resources", None),
    ];
    format!(
        "<div class=\"summary-grid\">\n{}\n</div>",
        cards.join("\n")
    )
}

fn render_breakdown_row(row: &CostBreakdownRow) -> String {
    format!(
        r#"<tr>
<td>{service}</td>
<td>{current}</td>
<td>{previous}</td>
<td class="{class}">{change}</td>
</tr>"#,
        service = html_escape(&row.service),
        current = format_currency(row.current_cost),
        previous = format_currency(row.previous_cost),
        class = row.polarity().css_class(),
        change = format_percent(row.change_percent),
    )
}

fn render_breakdown(rows: &[CostBreakdownRow]) -> String {
    let body: Vec<String> = rows.iter().map(render_breakdown_row).collect();
    format!(
        r#"<div class="section">
<h2>Cost Breakdown by Service</h2>
<table class="cost-table">
<thead>
<tr><th>Service/Tag</th><th>Current Cost</th><th>Previous Week</th><th>Change</th></tr>
</thead>
<tbody>
{rows}
</tbody>
</table>
</div>"#,
        rows = body.join("\n"),
    )
}

fn render_resource(resource: &ReportResource) -> String {
    format!(
        r#"<div class="resource-item">
<div class="resource-header">
<span class="resource-type">{kind}</span>
<span class="savings">Save {savings}/month</span>
</div>
<div><strong>Resource ID:</strong> {id}</div>
<div><strong>Region:</strong> {region}</div>
<div><strong>Recommendation:</strong> {recommendation}</div>
</div>"#,
        kind = html_escape(&resource.resource_type),
        savings = format_currency(resource.monthly_savings),
        id = html_escape(&resource.id),
        region = html_escape(&resource.region),
        recommendation = html_escape(
            resource
                .recommendation
                .as_deref()
                .unwrap_or(NO_RECOMMENDATION)
        ),
    )
}

fn render_resources(resources: &[ReportResource]) -> String {
    let body = if resources.is_empty() {
        r#"<p class="empty">No unused resources found.</p>"#.to_string()
    } else {
        resources
            .iter()
            .map(render_resource)
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        r#"<div class="section">
<h2>Unused Resources &amp; Optimization Opportunities</h2>
{body}
</div>"#
    )
}

fn render_recommendations(recommendations: &[String]) -> String {
    let items: Vec<String> = recommendations
        .iter()
        .map(|rec| format!("<li>{}</li>", html_escape(rec)))
        .collect();
    format!(
        r#"<div class="section">
<h2>Recommendations</h2>
<ul class="recommendations">
{items}
</ul>
</div>"#,
        items = items.join("\n"),
    )
}

fn render_footer() -> &'static str {
    r#"<div class="footer">
<p>This report was generated automatically by costwatch.</p>
<p>For questions or support, please contact your system administrator.</p>
</div>"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use costwatch_core::assembler::assemble_from_payload;
    use serde_json::json;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 14, 9, 0, 0).unwrap()
    }

    fn sample_report() -> WeeklyReport {
        assemble_from_payload(&json!({
            "period": "Oct 7 - Oct 13, 2024",
            "totalCost": 1247.85,
            "weeklyChange": -12.5,
            "potentialSavings": 66.65,
            "resourceCount": 47,
            "costBreakdown": [
                { "service": "Amazon EC2", "currentCost": 487.2, "previousCost": 520.1, "change": -6.3 },
                { "service": "Amazon S3", "currentCost": 120.0, "previousCost": 120.0, "change": 0.0 },
                { "service": "AWS Lambda", "currentCost": 40.5, "previousCost": 30.0, "change": 35.0 }
            ],
            "unusedResources": [
                {
                    "id": "vol-0987654321fedcba0",
                    "type": "EBS Volume",
                    "region": "us-west-2",
                    "monthlySavings": 12.3,
                    "recommendation": "Delete unattached volume"
                },
                { "id": "eipalloc-1", "type": "Elastic IP", "monthlySavings": 3.6 }
            ],
            "recommendations": ["Right-size <RDS> instances", "Enable S3 Intelligent-Tiering"]
        }))
        .unwrap()
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = sample_report();
        assert_eq!(
            render_report(&report, &generated_at()),
            render_report(&report, &generated_at())
        );
    }

    #[test]
    fn test_summary_metrics() {
        let html = render_report(&sample_report(), &generated_at());
        assert!(html.contains("Generated on October 14, 2024 09:00 UTC | Period: Oct 7 - Oct 13, 2024"));
        assert!(html.contains(r#"<div class="summary-value">$1247.85</div>"#));
        assert!(html.contains(r#"<div class="summary-value favorable">-12.5%</div>"#));
        assert!(html.contains(r#"<div class="summary-value">$66.65</div>"#));
        assert!(html.contains(r#"<div class="summary-value">47</div>"#));
    }

    #[test]
    fn test_breakdown_polarity_and_sign() {
        let html = render_report(&sample_report(), &generated_at());
        assert!(html.contains(r#"<td class="favorable">-6.3%</td>"#));
        assert!(html.contains(r#"<td class="unfavorable">+0.0%</td>"#));
        assert!(html.contains(r#"<td class="unfavorable">+35.0%</td>"#));
        assert!(html.contains("<td>$487.20</td>"));
    }

    #[test]
    fn test_non_negative_weekly_change_is_unfavorable() {
        let mut report = sample_report();
        report.weekly_change_percent = 0.0;
        let html = render_report(&report, &generated_at());
        assert!(html.contains(r#"<div class="summary-value unfavorable">+0.0%</div>"#));
    }

    #[test]
    fn test_sections_in_order() {
        let html = render_report(&sample_report(), &generated_at());
        let positions: Vec<usize> = [
            "AWS Cost Optimization Report",
            "<div class=\"summary-grid\">",
            "<h2>Cost Breakdown by Service</h2>",
            "Unused Resources &amp; Optimization Opportunities",
            "<h2>Recommendations</h2>",
            "class=\"footer\"",
        ]
        .iter()
        .map(|marker| html.find(marker).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let ec2 = html.find("Amazon EC2").unwrap();
        let s3 = html.find("Amazon S3").unwrap();
        let lambda = html.find("AWS Lambda").unwrap();
        assert!(ec2 < s3 && s3 < lambda);
    }

    #[test]
    fn test_resources_and_recommendations() {
        let html = render_report(&sample_report(), &generated_at());
        assert!(html.contains("<strong>Region:</strong> Global"));
        assert!(html.contains("Save $12.30/month"));
        assert!(html.contains(NO_RECOMMENDATION));
        assert!(html.contains("<li>Right-size &lt;RDS&gt; instances</li>"));
        let first = html.find("Right-size").unwrap();
        let second = html.find("Intelligent-Tiering").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_no_external_references() {
        let html = render_report(&sample_report(), &generated_at());
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
    }

    #[test]
    fn test_empty_report_renders() {
        let html = render_report(&costwatch_core::fallback::weekly_report(), &generated_at());
        assert!(html.contains("No unused resources found."));
        assert!(html.contains(r#"<div class="summary-value">$0.00</div>"#));
    }
}
