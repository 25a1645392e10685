use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::analytics::{
    calculate_total_revenue, customer_analysis, daily_sales_trend, find_peak_sales_day,
    product_sales_summary, region_wise_sales, ProductSales,
};
use crate::error::Result;
use crate::models::{EnrichedTransaction, Transaction};

const RULE_HEAVY: &str = "============================================================";
const RULE_LIGHT: &str = "------------------------------------------------------------";

/// Write the full analytics report to `path`.
pub fn write_report(
    path: &Path,
    sales: &[Transaction],
    enriched: &[EnrichedTransaction],
    non_enriched: &[EnrichedTransaction],
) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    render_report(&mut out, sales, enriched, non_enriched)?;
    out.flush()?;
    info!(path = %path.display(), "report written");
    Ok(())
}

/// Render the report into any writer; the binary points this at a file,
/// tests at a buffer.
pub fn render_report<W: Write>(
    out: &mut W,
    sales: &[Transaction],
    enriched: &[EnrichedTransaction],
    non_enriched: &[EnrichedTransaction],
) -> Result<()> {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(out, "{RULE_HEAVY}")?;
    writeln!(out, "                 SALES ANALYTICS REPORT")?;
    writeln!(out, "                 Generated: {now}")?;
    writeln!(out, "                 Records Processed: {}", sales.len())?;
    writeln!(out, "{RULE_HEAVY}")?;
    writeln!(out)?;

    let total_revenue = calculate_total_revenue(sales);
    let average_order = if sales.is_empty() {
        0.0
    } else {
        total_revenue / sales.len() as f64
    };
    let date_range = match (
        sales.iter().map(|txn| txn.date).min(),
        sales.iter().map(|txn| txn.date).max(),
    ) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "N/A".to_owned(),
    };

    writeln!(out, "OVERALL SUMMARY")?;
    writeln!(out, "{RULE_LIGHT}")?;
    writeln!(out, "Total Revenue:          {}", fmt_money(total_revenue))?;
    writeln!(out, "Total Transactions:     {}", sales.len())?;
    writeln!(out, "Average Order Value:    {}", fmt_money(average_order))?;
    writeln!(out, "Date Range:             {date_range}")?;
    writeln!(out, "{RULE_LIGHT}")?;

    let regions = region_wise_sales(sales);
    writeln!(out, "REGION-WISE PERFORMANCE")?;
    writeln!(out, "{RULE_LIGHT}")?;
    writeln!(
        out,
        "{:<15}{:<20}{:<15}{:<15}",
        "Region", "Sales", "% of Total", "Transactions"
    )?;
    for region in &regions {
        writeln!(
            out,
            "{:<15}{:<20}{:<15}{:<15}",
            region.region,
            fmt_money(region.total_sales),
            format!("{:.2}%", region.percentage),
            region.transaction_count
        )?;
    }
    writeln!(out, "{RULE_LIGHT}")?;

    // The report ranks products by revenue; the by-quantity ranking stays
    // with the top_selling_products analytic.
    let mut products = product_sales_summary(sales);
    products.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    writeln!(out, "TOP 5 PRODUCTS")?;
    writeln!(out, "{RULE_LIGHT}")?;
    writeln!(
        out,
        "{:<10}{:<20}{:<15}{:<15}",
        "Rank", "Product Name", "Qty Sold", "Revenue"
    )?;
    for (rank, product) in products.iter().take(5).enumerate() {
        writeln!(
            out,
            "{:<10}{:<20}{:<15}{:<15}",
            rank + 1,
            product.product_name,
            product.total_quantity,
            fmt_money(product.total_revenue)
        )?;
    }
    writeln!(out, "{RULE_LIGHT}")?;

    let customers = customer_analysis(sales);
    writeln!(out, "TOP 5 CUSTOMERS")?;
    writeln!(out, "{RULE_LIGHT}")?;
    writeln!(
        out,
        "{:<10}{:<15}{:<15}{:<15}",
        "Rank", "Customer ID", "Total Spent", "Order Count"
    )?;
    for (rank, customer) in customers.iter().take(5).enumerate() {
        writeln!(
            out,
            "{:<10}{:<15}{:<15}{:<15}",
            rank + 1,
            customer.customer_id,
            fmt_money(customer.total_spent),
            customer.purchase_count
        )?;
    }
    writeln!(out, "{RULE_LIGHT}")?;

    let days = daily_sales_trend(sales);
    writeln!(out, "DAILY SALES TREND")?;
    writeln!(out, "{RULE_LIGHT}")?;
    writeln!(
        out,
        "{:<15}{:<20}{:<15}{:<15}",
        "Date", "Revenue", "Transactions", "Unique Customers"
    )?;
    for day in &days {
        writeln!(
            out,
            "{:<15}{:<20}{:<15}{:<15}",
            day.date.to_string(),
            fmt_money(day.total_revenue),
            day.transaction_count,
            day.unique_customers
        )?;
    }
    writeln!(out, "{RULE_LIGHT}")?;

    writeln!(out, "PRODUCT PERFORMANCE ANALYSIS")?;
    writeln!(out, "{RULE_LIGHT}")?;
    let best_day = find_peak_sales_day(sales)
        .map(|peak| peak.date.to_string())
        .unwrap_or_else(|| "N/A".to_owned());
    writeln!(out, "Best Selling Day:        {best_day}")?;
    let low = low_sellers(&products);
    writeln!(
        out,
        "Low Performing Products: {}",
        if low.is_empty() {
            "None".to_owned()
        } else {
            low.join(", ")
        }
    )?;
    writeln!(out)?;
    writeln!(out, "Average Transaction Value per Region:")?;
    for region in &regions {
        let average = if region.transaction_count > 0 {
            region.total_sales / region.transaction_count as f64
        } else {
            0.0
        };
        writeln!(out, "  {:<7}:   {}", region.region, fmt_money(average))?;
    }
    writeln!(out, "{RULE_LIGHT}")?;

    let matched = enriched.iter().filter(|txn| txn.api_match).count();
    let total_seen = enriched.len() + non_enriched.len();
    let success_rate = if total_seen > 0 {
        matched as f64 / total_seen as f64 * 100.0
    } else {
        0.0
    };
    let missing: Vec<&str> = non_enriched
        .iter()
        .filter(|txn| !txn.api_match)
        .map(|txn| txn.product_id.as_str())
        .collect();
    writeln!(out, "API ENRICHMENT SUMMARY")?;
    writeln!(out, "{RULE_LIGHT}")?;
    writeln!(out, "Total Products Enriched: {matched}")?;
    writeln!(out, "Success Rate: {success_rate:.2}%")?;
    writeln!(
        out,
        "Products Not Enriched: {}",
        if missing.is_empty() {
            "None".to_owned()
        } else {
            missing.join(", ")
        }
    )?;
    write!(out, "{RULE_LIGHT}")?;

    Ok(())
}

/// Product names tied for the lowest cumulative quantity.
fn low_sellers(products: &[ProductSales]) -> Vec<String> {
    let Some(min_quantity) = products.iter().map(|p| p.total_quantity).min() else {
        return Vec::new();
    };
    products
        .iter()
        .filter(|p| p.total_quantity == min_quantity)
        .map(|p| p.product_name.clone())
        .collect()
}

/// `₹` plus a comma-grouped two-decimal amount.
fn fmt_money(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (whole, frac) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let mut grouped = String::new();
    for (i, digit) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let whole: String = grouped.chars().rev().collect();
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}₹{whole}.{frac}")
}
