//! Triptest entry point.
//!
//! Without a subcommand this starts the interactive dashboard. Subcommands
//! expose the same building blocks headlessly: inspect the field catalog,
//! probe the automation service, list its test cases, or run one execution
//! attempt straight from a JSON data file.

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use triptest_api::AutomationClient;
use triptest_types::{BookingMode, ExecutionOutcome, TestDataRecord, TestReport, form_fields};

#[derive(Parser)]
#[command(name = "triptest", about = "Travel-booking UI test dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the form field catalog for a booking mode
    Fields {
        /// Booking mode: flight, bus, train, or hotel
        #[arg(long)]
        mode: BookingMode,
    },
    /// Check that the automation service is reachable
    Probe,
    /// List test cases known to the automation service
    TestCases {
        /// Restrict the listing to one booking mode
        #[arg(long)]
        mode: Option<BookingMode>,
    },
    /// Run one execution attempt without the dashboard
    Run {
        /// Booking mode: flight, bus, train, or hotel
        #[arg(long)]
        mode: BookingMode,
        /// JSON object of field values merged over the seeded defaults
        #[arg(long)]
        data: Option<PathBuf>,
        /// Print the raw report JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let client = AutomationClient::from_env()?;

    match cli.command {
        None => {
            triptest_tui::run(client).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Fields { mode }) => {
            print_fields(mode);
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Probe) => match client.probe().await {
            Ok(()) => {
                println!("service reachable at {}", client.base_url());
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("{err}");
                Ok(ExitCode::from(2))
            }
        },
        Some(Command::TestCases { mode }) => {
            let cases = client.fetch_test_cases(mode).await?;
            if cases.is_empty() {
                println!("no test cases found");
            }
            for case in cases {
                println!("{:<12} {:<8} {} steps", case.test_case_id, case.booking_mode, case.step_count);
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Run { mode, data, json }) => run_headless(&client, mode, data, json).await,
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_fields(mode: BookingMode) {
    println!("{} test fields:", mode.title());
    for field in form_fields(mode) {
        let kind = format!("{:?}", field.kind).to_lowercase();
        let extra = if field.options.is_empty() {
            field.description.unwrap_or_default()
        } else {
            field.options.join(" | ")
        };
        println!("  {:<14} {:<8} {:<26} {extra}", field.key, kind, field.label);
    }
}

/// Seed the record, merge overrides from the data file, execute once, and
/// report. The exit code reflects the outcome class: 0 success, 1
/// application failure, 2 transport error.
async fn run_headless(
    client: &AutomationClient,
    mode: BookingMode,
    data: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let mut record = TestDataRecord::seeded(mode);
    if let Some(path) = data {
        let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        record.merge_json(&value, &form_fields(mode))?;
    }

    tracing::info!(mode = %mode, base = client.base_url(), "executing test");
    match client.execute_test(mode, record).await {
        ExecutionOutcome::Success(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(ExitCode::SUCCESS)
        }
        ExecutionOutcome::ApplicationFailure { message } => {
            eprintln!("test execution failed: {message}");
            Ok(ExitCode::from(1))
        }
        ExecutionOutcome::TransportError { message, timeout } => {
            eprintln!("transport error: {message}");
            if timeout {
                eprintln!("hint: check that the automation driver can launch the browser");
            } else {
                eprintln!("hint: verify the automation service is running at {}", client.base_url());
            }
            Ok(ExitCode::from(2))
        }
    }
}

fn print_report(report: &TestReport) {
    println!(
        "{} — {} ({} steps: {} passed, {} failed, {})",
        report.test_id,
        report.status,
        report.total_steps,
        report.passed_steps,
        report.failed_steps,
        report.execution_time.as_deref().unwrap_or("duration n/a"),
    );
    for step in &report.step_results {
        let detail = step
            .error
            .as_deref()
            .or(step.message.as_deref())
            .unwrap_or_default();
        println!(
            "  {:>3}. {:<18} {:<22} {:<8} {detail}",
            step.step_number,
            step.element_name,
            step.action_type,
            step.status,
        );
    }
}
