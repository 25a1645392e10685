pub mod analytics;
pub mod enrichment;
pub mod error;
pub mod filter;
pub mod models;
pub mod parser;
pub mod reader;
pub mod report;

use std::path::PathBuf;

use tracing::{info, warn};

use enrichment::ProductCatalog;
use error::Result;
use models::{FilterCriteria, Transaction};

/// Everything a pipeline run needs besides the catalog capability.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub enriched_out: PathBuf,
    pub report_out: PathBuf,
    pub criteria: FilterCriteria,
    pub low_stock_threshold: u64,
}

/// Counts the binary reports after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub records_read: usize,
    pub parsed: usize,
    pub filtered: usize,
    pub invalid: usize,
    pub enriched: usize,
    pub non_enriched: usize,
}

/// Run the whole pipeline: read, parse, filter, aggregate, enrich, report.
///
/// Per-record failures are absorbed into logs and counters along the way;
/// only I/O failures writing the two output files surface as errors. The
/// catalog is injected so tests can run the pipeline without the network.
pub fn run_pipeline(
    options: &PipelineOptions,
    catalog: &dyn ProductCatalog,
) -> Result<PipelineOutcome> {
    let (lines, encoding) = reader::read_sales_lines(&options.input);
    match encoding {
        Some(encoding) => info!(lines = lines.len(), encoding, "sales data loaded"),
        None => warn!("sales data unavailable, continuing with zero records"),
    }

    let transactions = parser::parse_transactions(&lines);
    log_filter_options(&transactions);

    let (filtered, invalid, summary) =
        filter::validate_and_filter(&transactions, &options.criteria);
    info!(
        valid = filtered.len(),
        invalid,
        filtered_by_region = summary.filtered_by_region,
        filtered_by_amount = summary.filtered_by_amount,
        final_count = summary.final_count,
        "validated transactions"
    );

    // Analytics run over the full parsed batch; the filtered subset above
    // feeds the summary counters only.
    log_analytics(&transactions, options.low_stock_threshold);

    let products = catalog.fetch_all_products();
    if products.is_empty() {
        warn!("no products fetched from catalog, enrichment will not match");
    }
    let mapping = enrichment::create_product_mapping(&products);
    let (enriched, non_enriched) = enrichment::enrich_transactions(&transactions, &mapping);
    enrichment::write_enriched_file(&options.enriched_out, &enriched)?;
    info!(path = %options.enriched_out.display(), "enriched data saved");

    report::write_report(&options.report_out, &transactions, &enriched, &non_enriched)?;

    Ok(PipelineOutcome {
        records_read: lines.len(),
        parsed: transactions.len(),
        filtered: filtered.len(),
        invalid,
        enriched: enriched.len(),
        non_enriched: non_enriched.len(),
    })
}

/// Log the regions and amount range a caller could filter on.
fn log_filter_options(transactions: &[Transaction]) {
    if transactions.is_empty() {
        return;
    }
    let mut regions: Vec<&str> = transactions.iter().map(|txn| txn.region.as_str()).collect();
    regions.sort_unstable();
    regions.dedup();
    let min_amount = transactions
        .iter()
        .map(Transaction::revenue)
        .fold(f64::INFINITY, f64::min);
    let max_amount = transactions
        .iter()
        .map(Transaction::revenue)
        .fold(f64::NEG_INFINITY, f64::max);
    info!(?regions, min_amount, max_amount, "filter options available");
}

/// Surface every analytic through the log.
fn log_analytics(transactions: &[Transaction], low_stock_threshold: u64) {
    let total_revenue = analytics::calculate_total_revenue(transactions);
    info!(total_revenue, "total revenue");

    for region in analytics::region_wise_sales(transactions) {
        info!(
            region = %region.region,
            total_sales = region.total_sales,
            transactions = region.transaction_count,
            percentage = region.percentage,
            "region-wise sales"
        );
    }

    for product in analytics::top_selling_products(transactions, 5) {
        info!(
            product = %product.product_name,
            quantity = product.total_quantity,
            revenue = product.total_revenue,
            "top selling product"
        );
    }

    for customer in analytics::customer_analysis(transactions) {
        info!(
            customer = %customer.customer_id,
            total_spent = customer.total_spent,
            purchases = customer.purchase_count,
            avg_order_value = customer.avg_order_value,
            "customer analysis"
        );
    }

    for day in analytics::daily_sales_trend(transactions) {
        info!(
            date = %day.date,
            revenue = day.total_revenue,
            transactions = day.transaction_count,
            unique_customers = day.unique_customers,
            "daily sales trend"
        );
    }

    match analytics::find_peak_sales_day(transactions) {
        Some(peak) => info!(
            date = %peak.date,
            revenue = peak.revenue,
            transactions = peak.transaction_count,
            "peak sales day"
        ),
        None => info!("peak sales day: no data"),
    }

    for product in analytics::low_performing_products(transactions, low_stock_threshold) {
        info!(
            product = %product.product_name,
            quantity = product.total_quantity,
            revenue = product.total_revenue,
            "low performing product"
        );
    }
}
