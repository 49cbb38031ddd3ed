//! CLI interface for costwatch
//!
//! This module defines the command-line interface using clap. Connection
//! settings can come from flags or from the environment, so the same binary
//! works from a shell and from a scheduled job.
//!
//! # Example
//!
//! ```bash
//! # Dashboard summary against a local API
//! costwatch summary
//!
//! # Export the weekly report
//! COSTWATCH_API_URL=https://costs.example.com costwatch report --output week.html
//!
//! # Latest stored report from a directory-backed bucket
//! costwatch --storage-root /srv/objects --bucket cost-reports lookup
//! ```

use clap::{Parser, Subcommand};
use costwatch_core::error::{CostwatchError, Result};
use costwatch_gateway::transport::DEFAULT_API_URL;
use costwatch_lookup::handler::DEFAULT_PREFIX;
use std::path::PathBuf;

/// Default file name for exported reports
pub const DEFAULT_REPORT_FILE: &str = "cost-report.html";

/// Cloud cost summaries, unused-resource findings and weekly reports
#[derive(Parser, Debug, Clone)]
#[command(name = "costwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Base URL of the cost API
    #[arg(long, env = "COSTWATCH_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Bucket holding stored reports
    #[arg(long, env = "COSTWATCH_REPORTS_BUCKET", global = true)]
    pub bucket: Option<String>,

    /// Key prefix of stored reports
    #[arg(long, env = "COSTWATCH_REPORTS_PREFIX", default_value = DEFAULT_PREFIX, global = true)]
    pub prefix: String,

    /// Directory that holds one subdirectory per bucket
    #[arg(long, env = "COSTWATCH_STORAGE_ROOT", global = true)]
    pub storage_root: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the cost summary and unused resources
    Summary {
        /// Also write a dashboard snapshot to this HTML file
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Export the weekly report as a self-contained HTML document
    Report {
        /// Output file
        #[arg(long, short = 'o', default_value = DEFAULT_REPORT_FILE)]
        output: PathBuf,
    },

    /// Print the latest stored report from the API
    Latest,

    /// Ask the API to generate a weekly report
    RequestReport {
        /// First day of the report (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day of the report (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Address to deliver the report to
        #[arg(long)]
        email: Option<String>,
    },

    /// Subscribe an address to budget alerts
    Subscribe {
        /// Budget identifier
        #[arg(long)]
        budget_id: String,

        /// Address that receives alerts
        #[arg(long)]
        email: String,

        /// Alert threshold in percent of the budget
        #[arg(long, allow_hyphen_values = true)]
        threshold: String,
    },

    /// Find the latest report in object storage
    Lookup,

    /// Build a weekly report from a local cost file
    Compose {
        /// Input JSON with current and previous per-service costs
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Output HTML file (JSON is printed instead when omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Parse a `YYYY-MM-DD` date argument
///
/// # Examples
///
/// ```
/// use costwatch::cli::parse_date;
/// use chrono::Datelike;
///
/// let date = parse_date("2024-10-07").unwrap();
/// assert_eq!(date.day(), 7);
/// assert!(parse_date("2024-10").is_err());
/// ```
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        CostwatchError::InvalidDate(format!(
            "Invalid date format '{date_str}', expected YYYY-MM-DD"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["costwatch", "--json", "summary"]);
        assert!(cli.json);
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Command::Summary { html: None }));

        let cli = Cli::parse_from(["costwatch", "report", "-v"]);
        assert!(cli.verbose);
        match &cli.command {
            Command::Report { output } => assert_eq!(output, &PathBuf::from(DEFAULT_REPORT_FILE)),
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_connection_flags() {
        let cli = Cli::parse_from([
            "costwatch",
            "--api-url",
            "https://costs.example.com",
            "--bucket",
            "cost-reports",
            "--storage-root",
            "/srv/objects",
            "lookup",
        ]);
        assert_eq!(cli.api_url, "https://costs.example.com");
        assert_eq!(cli.bucket.as_deref(), Some("cost-reports"));
        assert_eq!(cli.prefix, DEFAULT_PREFIX);
        assert_eq!(cli.storage_root, Some(PathBuf::from("/srv/objects")));
        assert!(matches!(cli.command, Command::Lookup));
    }

    #[test]
    fn test_subscribe_accepts_negative_threshold_text() {
        let cli = Cli::parse_from([
            "costwatch",
            "subscribe",
            "--budget-id",
            "monthly-ops",
            "--email",
            "ops@example.com",
            "--threshold",
            "-5",
        ]);
        match cli.command {
            Command::Subscribe { threshold, .. } => assert_eq!(threshold, "-5"),
            _ => panic!("Expected Subscribe command"),
        }
    }

    #[test]
    fn test_request_report_parsing() {
        let cli = Cli::parse_from([
            "costwatch",
            "request-report",
            "--start",
            "2024-10-07",
            "--end",
            "2024-10-13",
        ]);
        match cli.command {
            Command::RequestReport { start, end, email } => {
                assert_eq!(parse_date(&start).unwrap().day(), 7);
                assert_eq!(parse_date(&end).unwrap().day(), 13);
                assert!(email.is_none());
            }
            _ => panic!("Expected RequestReport command"),
        }
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-02-29").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));

        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("10/07/2024").is_err());
        assert!(parse_date("").is_err());
    }
}
