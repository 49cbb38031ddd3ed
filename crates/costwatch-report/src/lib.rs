//! HTML rendering for costwatch
//!
//! This crate turns canonical cost records into self-contained documents:
//! the weekly report meant for print-to-PDF export and a dashboard snapshot
//! with a breakdown donut chart.

pub mod chart;
pub mod dashboard;
pub mod format;
pub mod html;

pub use dashboard::render_dashboard;
pub use html::render_report;
