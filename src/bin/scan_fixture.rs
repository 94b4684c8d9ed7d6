//! Run a full boundary scan against a JSON fixture
//!
//! Usage:
//!   scan_fixture <fixture.json> [--customer ID] [--parallel] [--estimate-units] [--messages]
//!
//! Prints the scan summary as JSON on stdout. `--messages` prints the chat
//! notification for each alert instead; `--estimate-units` only estimates
//! processing units. Logs go to stderr (`RUST_LOG` overrides the level).

use anyhow::{bail, Context, Result};
use parcel_monitor_rust::scanner::estimate_scan_units;
use parcel_monitor_rust::{BoundaryScanner, JsonFormatter, ScanFixture, TextFormatter};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Args {
    fixture: PathBuf,
    customer: Option<String>,
    parallel: bool,
    estimate_units: bool,
    messages: bool,
}

fn parse_args() -> Result<Args> {
    let mut fixture = None;
    let mut customer = None;
    let mut parallel = false;
    let mut estimate_units = false;
    let mut messages = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--customer" => {
                customer = Some(args.next().context("--customer needs a customer id")?);
            }
            "--parallel" => parallel = true,
            "--estimate-units" => estimate_units = true,
            "--messages" => messages = true,
            other if other.starts_with("--") => bail!("Unknown flag: {}", other),
            other => fixture = Some(PathBuf::from(other)),
        }
    }

    let Some(fixture) = fixture else {
        bail!("Usage: scan_fixture <fixture.json> [--customer ID] [--parallel] [--estimate-units] [--messages]");
    };
    Ok(Args { fixture, customer, parallel, estimate_units, messages })
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parcel_monitor_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args()?;
    let fixture = ScanFixture::load(&args.fixture)?;
    let filter = args.customer.as_deref();

    if args.estimate_units {
        let units = estimate_scan_units(&fixture.customers, filter);
        tracing::info!(units, "Estimate only, no providers queried");
        println!("{}", units);
        return Ok(());
    }

    let provider = fixture.provider();
    let scanner = BoundaryScanner::new(&fixture.config, fixture.analysis_date, &provider, &provider);

    let start = Instant::now();
    let summary = if args.parallel {
        scanner.scan_customers_parallel(&fixture.customers, filter)
    } else {
        scanner.scan_customers(&fixture.customers, filter)
    };
    tracing::info!(
        customers = summary.customers_scanned,
        analysed = summary.boundaries_analysed,
        failed = summary.boundaries_failed,
        alerts = summary.alerts_triggered,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Scan complete"
    );

    if args.messages {
        let detected_at = chrono::Local::now().naive_local();
        for alert in &summary.alerts {
            println!("{}\n", TextFormatter::format(alert, detected_at));
        }
    } else {
        println!("{}", JsonFormatter::format(&summary)?);
    }

    Ok(())
}
