//! Core types, payload normalization and report assembly for costwatch
//!
//! This crate provides the canonical cost records, the error type, the
//! normalizer for upstream payload shapes, the weekly report assembler and
//! the static fallback data used by the gateway, plus rule-based
//! recommendations for locally composed reports.

pub mod assembler;
pub mod breakdown;
pub mod error;
pub mod fallback;
pub mod normalizer;
pub mod recommendations;
pub mod types;

// Re-export commonly used types
pub use error::{CostwatchError, Result};
pub use types::{
    BreakdownEntry, BudgetSubscription, CostBreakdownRow, CostSummary, Polarity, ReportResource,
    TrendSource, UnusedResource, WeeklyReport, WeeklyReportRequest,
};
