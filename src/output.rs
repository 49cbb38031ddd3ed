//! Output formatting module for costwatch
//!
//! This module provides formatters for displaying cost data in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```no_run
//! use costwatch::output::get_formatter;
//! use costwatch_gateway::{CostDataGateway, HttpTransport};
//!
//! # async fn run() {
//! let gateway = CostDataGateway::new(HttpTransport::new("http://localhost:3000"));
//! let dashboard = gateway.fetch_dashboard().await;
//!
//! // Table output for a terminal
//! println!("{}", get_formatter(false, true).format_dashboard(&dashboard));
//!
//! // JSON output for scripts
//! println!("{}", get_formatter(true, false).format_dashboard(&dashboard));
//! # }
//! ```

use colored::*;
use costwatch_core::types::{Polarity, WeeklyReport};
use costwatch_gateway::{DataSource, Dashboard};
use costwatch_lookup::LookupResponse;
use costwatch_report::format::{format_currency, format_percent};
use prettytable::{Cell, Row, Table, format, row};
use serde::Serialize;
use serde_json::{Value, json};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format the dashboard: cost summary and unused resources
    fn format_dashboard(&self, dashboard: &Dashboard) -> String;

    /// Format a weekly report
    fn format_report(&self, report: &WeeklyReport, source: DataSource) -> String;

    /// Format the latest stored report payload
    fn format_latest(&self, payload: &Value) -> String;

    /// Format a latest-report lookup response
    fn format_lookup(&self, response: &LookupResponse) -> String;
}

/// Table formatter for human-readable output
pub struct TableFormatter {
    /// Whether to colour polarity and notices
    pub colored_output: bool,
}

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new(colored_output: bool) -> Self {
        Self { colored_output }
    }

    fn polarity_cell(&self, change_percent: f64) -> Cell {
        let cell = Cell::new(&format_percent(change_percent));
        if !self.colored_output {
            return cell.style_spec("r");
        }
        match Polarity::from_change(change_percent) {
            Polarity::Favorable => cell.style_spec("rFg"),
            Polarity::Unfavorable => cell.style_spec("rFr"),
        }
    }

    fn polarity_text(&self, change_percent: f64) -> String {
        let text = format_percent(change_percent);
        if !self.colored_output {
            return text;
        }
        match Polarity::from_change(change_percent) {
            Polarity::Favorable => text.green().to_string(),
            Polarity::Unfavorable => text.red().to_string(),
        }
    }

    fn fallback_notice(&self, what: &str) -> String {
        let text = format!("Could not reach the cost API, showing sample {what}");
        if self.colored_output {
            format!("{}\n", text.yellow())
        } else {
            format!("{text}\n")
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.colored_output {
            format!("{}\n", text.bold())
        } else {
            format!("{text}\n")
        }
    }
}

impl OutputFormatter for TableFormatter {
    fn format_dashboard(&self, dashboard: &Dashboard) -> String {
        let summary = &dashboard.summary.data;
        let mut output = String::new();

        if dashboard.summary.is_fallback() {
            output.push_str(&self.fallback_notice("cost data"));
        }
        output.push_str(&self.heading(&format!(
            "Costs {} to {}",
            summary.period_start.format("%Y-%m-%d"),
            summary.period_end.format("%Y-%m-%d")
        )));
        output.push_str(&format!(
            "Total: {}   {}: {}\n\n",
            format_currency(summary.total_cost),
            summary.trend_label(),
            self.polarity_text(summary.trend_percent)
        ));

        if summary.breakdown.is_empty() {
            output.push_str("No cost data available\n");
        } else {
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
            table.set_titles(row![b -> "Label", b -> "Cost"]);
            for entry in &summary.breakdown {
                table.add_row(row![entry.label, r -> format_currency(entry.cost)]);
            }
            output.push_str(&table.to_string());
        }

        output.push('\n');
        if dashboard.unused_resources.is_fallback() {
            output.push_str(&self.fallback_notice("unused resources"));
        }
        output.push_str(&self.heading("Unused resources"));

        let resources = &dashboard.unused_resources.data;
        if resources.is_empty() {
            output.push_str("No unused resources found\n");
            return output;
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Resource",
            b -> "Type",
            b -> "Region",
            b -> "Savings/mo",
            b -> "Recommendation"
        ]);
        for resource in resources {
            table.add_row(row![
                resource.id,
                resource.resource_type,
                resource.region_or_global(),
                r -> format_currency(resource.monthly_savings),
                resource.recommendation.as_deref().unwrap_or("")
            ]);
        }
        let total: f64 = resources.iter().map(|r| r.monthly_savings).sum();
        table.add_row(Row::new(vec![Cell::new(""); 5]));
        table.add_row(row![b -> "TOTAL", "", "", b -> format_currency(total), ""]);

        output.push_str(&table.to_string());
        output
    }

    fn format_report(&self, report: &WeeklyReport, source: DataSource) -> String {
        let mut output = String::new();

        if source == DataSource::Fallback {
            output.push_str(&self.fallback_notice("report"));
        }
        output.push_str(&self.heading(&format!("Weekly report: {}", report.period)));
        output.push_str(&format!(
            "Total: {}   Weekly change: {}   Potential savings: {}   Resources: {}\n\n",
            format_currency(report.total_cost),
            self.polarity_text(report.weekly_change_percent),
            format_currency(report.potential_savings),
            report.resource_count
        ));

        if !report.cost_breakdown.is_empty() {
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
            table.set_titles(row![
                b -> "Service",
                b -> "Current",
                b -> "Previous",
                b -> "Change"
            ]);
            for row in &report.cost_breakdown {
                table.add_row(Row::new(vec![
                    Cell::new(&row.service),
                    Cell::new(&format_currency(row.current_cost)).style_spec("r"),
                    Cell::new(&format_currency(row.previous_cost)).style_spec("r"),
                    self.polarity_cell(row.change_percent),
                ]));
            }
            output.push_str(&table.to_string());
        }

        for recommendation in &report.recommendations {
            output.push_str(&format!("  - {recommendation}\n"));
        }
        output
    }

    fn format_latest(&self, payload: &Value) -> String {
        pretty(payload)
    }

    fn format_lookup(&self, response: &LookupResponse) -> String {
        let mut output = format!("Status: {}\n", response.status_code);
        for (name, value) in &response.headers {
            output.push_str(&format!("{name}: {value}\n"));
        }
        output.push('\n');
        output.push_str(&response.body);
        output
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_dashboard(&self, dashboard: &Dashboard) -> String {
        pretty(dashboard)
    }

    fn format_report(&self, report: &WeeklyReport, source: DataSource) -> String {
        pretty(&json!({
            "source": source,
            "report": report,
        }))
    }

    fn format_latest(&self, payload: &Value) -> String {
        pretty(payload)
    }

    fn format_lookup(&self, response: &LookupResponse) -> String {
        pretty(response)
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string())
}

/// Get the appropriate formatter based on output preference
pub fn get_formatter(json: bool, colored_output: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new(colored_output))
    }
}
