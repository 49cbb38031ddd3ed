//! costwatch - Cloud cost summaries, unused-resource findings and weekly reports
//!
//! This library provides functionality to:
//! - Normalize cost summaries from either upstream payload shape
//! - Fetch dashboard data with static fallback when the API is unreachable
//! - Assemble and render weekly reports as self-contained HTML documents
//! - Look up the latest stored report in object storage
//!
//! # Examples
//!
//! ```no_run
//! use costwatch::{CostDataGateway, HttpTransport, render_report};
//!
//! #[tokio::main]
//! async fn main() -> costwatch::Result<()> {
//!     let gateway = CostDataGateway::new(HttpTransport::new("http://localhost:3000"));
//!
//!     let report = gateway.fetch_weekly_report().await;
//!     let html = render_report(&report.data, &chrono::Utc::now());
//!     std::fs::write("cost-report.html", html)?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod compose;
pub mod output;

// Re-export commonly used types
pub use costwatch_core::error::{CostwatchError, Result};
pub use costwatch_core::types::{
    BreakdownEntry, BudgetSubscription, CostBreakdownRow, CostSummary, UnusedResource,
    WeeklyReport, WeeklyReportRequest,
};
pub use costwatch_gateway::{CostDataGateway, DataSource, Dashboard, HttpTransport, ViewScope};
pub use costwatch_lookup::{FsObjectStore, LatestReportHandler, LookupConfig, LookupResponse};
pub use costwatch_report::{render_dashboard, render_report};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
