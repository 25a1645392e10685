use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sales_analytics::enrichment::{DummyJsonCatalog, DEFAULT_PRODUCTS_URL};
use sales_analytics::models::FilterCriteria;
use sales_analytics::{run_pipeline, PipelineOptions};

#[derive(Parser, Debug)]
#[command(name = "sales-analytics")]
#[command(about = "Parse, validate, analyze, and enrich a pipe-delimited sales file")]
struct Cli {
    /// Pipe-delimited sales data file.
    #[arg(long, default_value = "data/sales_data.txt")]
    input: PathBuf,

    /// Destination for the enriched pipe-delimited records.
    #[arg(long, default_value = "output/enriched_sales_data.txt")]
    enriched_out: PathBuf,

    /// Destination for the plain-text report.
    #[arg(long, default_value = "output/sales_report.txt")]
    report_out: PathBuf,

    /// Region filter (case-insensitive exact match).
    #[arg(long)]
    region: Option<String>,

    /// Lower bound for the amount filter (quantity x price).
    #[arg(long)]
    min_amount: Option<f64>,

    /// Upper bound for the amount filter (quantity x price).
    #[arg(long)]
    max_amount: Option<f64>,

    /// Products selling fewer units than this count as low performers.
    #[arg(long, default_value_t = 10)]
    low_stock_threshold: u64,

    /// Product catalog endpoint.
    #[arg(long, env = "PRODUCTS_URL", default_value = DEFAULT_PRODUCTS_URL)]
    products_url: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sales_analytics=info")),
        )
        .init();

    let cli = Cli::parse();

    let options = PipelineOptions {
        input: cli.input,
        enriched_out: cli.enriched_out,
        report_out: cli.report_out,
        criteria: FilterCriteria {
            region: cli.region,
            min_amount: cli.min_amount,
            max_amount: cli.max_amount,
        },
        low_stock_threshold: cli.low_stock_threshold,
    };

    for out in [&options.enriched_out, &options.report_out] {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
    }

    let catalog = DummyJsonCatalog::new(cli.products_url);
    let outcome = run_pipeline(&options, &catalog)
        .context("failed to run sales analytics pipeline")?;

    println!("Records read:    {}", outcome.records_read);
    println!("Parsed:          {}", outcome.parsed);
    println!(
        "After filtering: {} (invalid: {})",
        outcome.filtered, outcome.invalid
    );
    println!(
        "Enriched:        {} / {}",
        outcome.enriched,
        outcome.enriched + outcome.non_enriched
    );
    println!("Report:          {}", options.report_out.display());

    Ok(())
}
