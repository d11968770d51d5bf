use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use esop_export::{CsvReport, ResultsSnapshot, Scenario};

/// Evaluate a scenario file and export the results.
///
/// The scenario file is a JSON document tagged with a "scenario" field:
/// - "india-esop": India ESOP exercise and sale
/// - "us-esop": US ESOP exercise and sale, with compensation either entered
///   directly or computed from a household income-tax input
/// - "income-tax": US/CA household income tax
#[derive(Parser, Debug)]
#[command(name = "esop-export")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the scenario JSON file
    #[arg(short, long)]
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Csv,
}

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `warn` so exported output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let contents = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read: {}", args.file.display()))?;

    let scenario: Scenario = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse scenario: {}", args.file.display()))?;
    debug!(scenario = scenario.label(), "parsed scenario document");

    let output = scenario
        .evaluate()
        .with_context(|| format!("Failed to evaluate {} scenario", scenario.label()))?;

    let rendered = match args.format {
        Format::Json => ResultsSnapshot::capture(&scenario, &output)?.to_json_pretty()?,
        Format::Csv => CsvReport::capture(&scenario, &output)?.render()?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            println!(
                "Exported {} scenario to: {}",
                scenario.label(),
                path.display()
            );
        }
        None if rendered.ends_with('\n') => print!("{rendered}"),
        None => println!("{rendered}"),
    }

    Ok(())
}
