//! Integration tests for costwatch CLI commands
//!
//! These tests exercise the building blocks main.rs wires together, using
//! files on disk instead of a running API.

mod common;

use clap::Parser;
use common::{generated_at, put_object, storage_with_bucket};
use costwatch::cli::{Cli, Command, parse_date};
use costwatch::compose::{ComposeInput, compose_report};
use costwatch::output::get_formatter;
use costwatch_core::types::WeeklyReportRequest;
use costwatch_lookup::{FsObjectStore, LatestReportHandler, LookupConfig};
use costwatch_report::render_report;
use serde_json::Value;
use tempfile::TempDir;

const COST_FILE: &str = r#"{
    "period": "Oct 7 - Oct 13, 2024",
    "currentCosts": { "EC2": 812.40, "S3": 96.10, "CloudWatch": 12.00 },
    "previousCosts": { "EC2": 640.00, "S3": 101.75 },
    "unusedResources": [
        { "id": "vol-0a1b", "type": "EBS Volume", "region": "us-east-1",
          "estimatedMonthlySavingsUsd": 8.0, "details": "Snapshot then delete" }
    ],
    "recommendations": ["Delete unattached EBS volumes"]
}"#;

#[tokio::test]
async fn test_compose_from_file_to_html() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("costs.json");
    tokio::fs::write(&input, COST_FILE).await.unwrap();

    let report = compose_report(ComposeInput::from_file(&input).await.unwrap());
    let services: Vec<_> = report
        .cost_breakdown
        .iter()
        .map(|r| r.service.as_str())
        .collect();
    assert_eq!(services, ["EC2", "S3", "CloudWatch"]);
    // No baseline for CloudWatch
    assert_eq!(report.cost_breakdown[2].change_percent, 0.0);

    let output = temp.path().join("cost-report.html");
    tokio::fs::write(&output, render_report(&report, &generated_at()))
        .await
        .unwrap();
    let html = tokio::fs::read_to_string(&output).await.unwrap();
    assert!(html.contains("Snapshot then delete"));
    assert!(html.contains("Save $8.00/month"));
}

#[tokio::test]
async fn test_compose_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = ComposeInput::from_file(&temp.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, costwatch_core::CostwatchError::Io(_)));
}

#[tokio::test]
async fn test_lookup_output_formats() {
    let storage = storage_with_bucket("cost-reports");
    put_object(
        storage.path(),
        "cost-reports",
        "reports/week-42.json",
        r#"{"period":"Oct 7 - Oct 13, 2024"}"#,
        1_728_864_000,
    );
    let handler = LatestReportHandler::new(
        FsObjectStore::new(storage.path()),
        LookupConfig::new("cost-reports"),
    );
    let response = handler.handle().await;

    let table = get_formatter(false, false).format_lookup(&response);
    assert!(table.starts_with("Status: 200\n"));
    assert!(table.contains("Access-Control-Allow-Origin: *"));

    let json: Value =
        serde_json::from_str(&get_formatter(true, false).format_lookup(&response)).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["body"], r#"{"period":"Oct 7 - Oct 13, 2024"}"#);
}

#[test]
fn test_request_report_arguments_validate() {
    let cli = Cli::parse_from([
        "costwatch",
        "request-report",
        "--start",
        "2024-10-13",
        "--end",
        "2024-10-07",
        "--email",
        "finops@example.com",
    ]);
    let Command::RequestReport { start, end, email } = cli.command else {
        panic!("Expected RequestReport command");
    };

    let request = WeeklyReportRequest {
        start_date: parse_date(&start).unwrap(),
        end_date: parse_date(&end).unwrap(),
        email,
    };
    assert!(request.validate().is_err());
}
