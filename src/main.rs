//! costwatch - Cloud cost summaries, unused-resource findings and weekly reports

use chrono::Utc;
use clap::Parser;
use costwatch::{
    cli::{Cli, Command, parse_date},
    compose::{ComposeInput, compose_report},
    output::get_formatter,
};
use costwatch_core::error::{CostwatchError, Result};
use costwatch_core::types::{BudgetSubscription, WeeklyReportRequest};
use costwatch_gateway::{CostDataGateway, DataSource, HttpTransport, ViewScope};
use costwatch_lookup::{FsObjectStore, LatestReportHandler, LookupConfig};
use costwatch_report::{render_dashboard, render_report};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Write a rendered document and report where it went
async fn write_document(path: &Path, html: String) -> Result<()> {
    tokio::fs::write(path, html).await?;
    info!("Wrote {}", path.display());
    println!("Saved {}", path.display());
    Ok(())
}

/// Build the lookup handler from global flags
fn lookup_handler(cli: &Cli) -> Result<LatestReportHandler<FsObjectStore>> {
    let root = cli.storage_root.clone().ok_or_else(|| {
        CostwatchError::Config("--storage-root or COSTWATCH_STORAGE_ROOT is required".into())
    })?;
    let bucket = cli.bucket.clone().ok_or_else(|| {
        CostwatchError::Config("--bucket or COSTWATCH_REPORTS_BUCKET is required".into())
    })?;
    let config = LookupConfig::new(bucket).with_prefix(cli.prefix.clone());
    config.validate()?;
    Ok(LatestReportHandler::new(FsObjectStore::new(root), config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. --verbose overrides RUST_LOG.
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("costwatch=info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("costwatch=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let colored_output = is_terminal::is_terminal(std::io::stdout())
        && std::env::var("NO_COLOR").is_err();
    let formatter = get_formatter(cli.json, colored_output);
    let gateway = CostDataGateway::new(HttpTransport::new(cli.api_url.clone()));

    match &cli.command {
        Command::Summary { html } => {
            info!("Loading dashboard from {}", cli.api_url);

            // Ctrl-C closes the view; a load that finishes later is dropped.
            let scope = ViewScope::new();
            let closer = scope.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    closer.close();
                }
            });

            let Some(dashboard) = scope.run(gateway.fetch_dashboard()).await else {
                info!("Dashboard closed before data arrived");
                return Ok(());
            };

            println!("{}", formatter.format_dashboard(&dashboard));
            if let Some(path) = html {
                let document = render_dashboard(
                    &dashboard.summary.data,
                    &dashboard.unused_resources.data,
                    &Utc::now(),
                );
                write_document(path, document).await?;
            }
        }
        Command::Report { output } => {
            info!("Exporting weekly report");
            let report = gateway.fetch_weekly_report().await;

            if cli.json {
                println!("{}", formatter.format_report(&report.data, report.source));
            } else {
                write_document(output, render_report(&report.data, &Utc::now())).await?;
            }
        }
        Command::Latest => {
            let payload = gateway.fetch_latest_report().await?;
            println!("{}", formatter.format_latest(&payload));
        }
        Command::RequestReport { start, end, email } => {
            let request = WeeklyReportRequest {
                start_date: parse_date(start)?,
                end_date: parse_date(end)?,
                email: email.clone(),
            };
            gateway.request_weekly_report(&request).await?;
            println!(
                "Weekly report requested for {} to {}",
                request.start_date, request.end_date
            );
        }
        Command::Subscribe {
            budget_id,
            email,
            threshold,
        } => {
            let subscription = BudgetSubscription::parse(budget_id, email, threshold)?;
            gateway.subscribe_budget_alerts(&subscription).await?;
            println!(
                "Subscribed {} to alerts for {} at {}%",
                subscription.email, subscription.budget_id, subscription.threshold_percent
            );
        }
        Command::Lookup => {
            let handler = lookup_handler(&cli)?;
            let response = handler.handle().await;
            println!("{}", formatter.format_lookup(&response));
            if !response.is_success() {
                std::process::exit(1);
            }
        }
        Command::Compose { input, output } => {
            let report = compose_report(ComposeInput::from_file(input).await?);
            match output {
                Some(path) if !cli.json => {
                    write_document(path, render_report(&report, &Utc::now())).await?;
                }
                _ => println!("{}", formatter.format_report(&report, DataSource::Live)),
            }
        }
    }

    Ok(())
}
