//! apexscan - Security assessment of an ApexShare deployment through OWASP ZAP.

mod args;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use apexscan_report::ReportWriter;
use apexscan_scanner::{RunResult, ScanOrchestrator};
use apexscan_zap::ZapClient;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::args::Cli;

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,apexscan=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            println!("Security scan failed!");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;

    if cli.print_config {
        print!("{}", config.to_toml().context("failed to render configuration")?);
        return Ok(());
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        url = %config.target.target_url,
        api = %config.target.api_url,
        engine = %config.engine.api_url,
        "Starting apexscan"
    );

    let engine = ZapClient::from_config(&config.engine).context("failed to create ZAP client")?;
    let writer = ReportWriter::new(config.report.output_dir.clone());

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let result = ScanOrchestrator::new(Arc::new(engine), config)
        .with_cancellation(cancel.clone())
        .run()
        .await
        .context("security scan aborted")?;

    if cancel.is_cancelled() {
        anyhow::bail!("security scan interrupted, reports not written");
    }
    writer.write(&result).context("failed to write reports")?;

    print_summary(&result);
    println!("Security scan completed successfully!");
    Ok(())
}

/// Cancel the run on Ctrl-C.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping the scan...");
            cancel.cancel();
        }
    });
}

fn print_summary(result: &RunResult) {
    let summary = &result.vulnerability_summary;
    let rule = "=".repeat(50);

    println!("\n{rule}");
    println!("SECURITY SCAN COMPLETED");
    println!("{rule}");
    println!("Total vulnerabilities: {}", summary.total_vulnerabilities);
    println!("High risk: {}", summary.high_risk);
    println!("Medium risk: {}", summary.medium_risk);
    println!("{rule}");
}
