use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::error;

use crate::models::Transaction;

/// Per-region aggregate, percentage relative to the batch grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: f64,
    pub transaction_count: usize,
    pub percentage: f64,
}

/// Per-product aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub product_name: String,
    pub total_quantity: u64,
    pub total_revenue: f64,
}

/// Per-customer aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerStats {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    pub avg_order_value: f64,
    pub products_bought: Vec<String>,
}

/// Per-day aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total_revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

/// Highest-revenue day.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub revenue: f64,
    pub transaction_count: usize,
}

/// Round a currency or percentage figure to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sum of `quantity × price` over the batch. A record whose product is not
/// a finite number is logged and contributes nothing.
pub fn calculate_total_revenue(transactions: &[Transaction]) -> f64 {
    let mut total = 0.0;
    for txn in transactions {
        let revenue = txn.revenue();
        if !revenue.is_finite() {
            error!(id = %txn.transaction_id, "non-finite revenue, record contributes nothing");
            continue;
        }
        total += revenue;
    }
    total
}

/// Group sales by region, largest total first.
pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionSales> {
    let grand_total = calculate_total_revenue(transactions);

    let mut by_region: HashMap<&str, (f64, usize)> = HashMap::new();
    for txn in transactions {
        let entry = by_region.entry(txn.region.as_str()).or_default();
        entry.0 += txn.revenue();
        entry.1 += 1;
    }

    let mut regions: Vec<RegionSales> = by_region
        .into_iter()
        .map(|(region, (total_sales, transaction_count))| RegionSales {
            region: region.to_owned(),
            total_sales,
            transaction_count,
            percentage: if grand_total > 0.0 {
                round2(total_sales / grand_total * 100.0)
            } else {
                0.0
            },
        })
        .collect();
    regions.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    regions
}

/// Per-product totals, in first-encounter order. Callers apply their own
/// ordering on top.
pub fn product_sales_summary(transactions: &[Transaction]) -> Vec<ProductSales> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut products: Vec<ProductSales> = Vec::new();
    for txn in transactions {
        let slot = *index.entry(txn.product_name.as_str()).or_insert_with(|| {
            products.push(ProductSales {
                product_name: txn.product_name.clone(),
                total_quantity: 0,
                total_revenue: 0.0,
            });
            products.len() - 1
        });
        products[slot].total_quantity += u64::from(txn.quantity);
        products[slot].total_revenue += txn.revenue();
    }
    products
}

/// Top `n` products by total quantity sold, revenue rounded for output.
pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    let mut products = product_sales_summary(transactions);
    products.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    products.truncate(n);
    for product in &mut products {
        product.total_revenue = round2(product.total_revenue);
    }
    products
}

/// Products whose cumulative quantity stayed below `threshold`, slowest
/// sellers first.
pub fn low_performing_products(transactions: &[Transaction], threshold: u64) -> Vec<ProductSales> {
    let mut products: Vec<ProductSales> = product_sales_summary(transactions)
        .into_iter()
        .filter(|product| product.total_quantity < threshold)
        .map(|product| ProductSales {
            total_revenue: round2(product.total_revenue),
            ..product
        })
        .collect();
    products.sort_by_key(|product| product.total_quantity);
    products
}

/// Per-customer purchase behaviour, biggest spenders first.
pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerStats> {
    let mut by_customer: HashMap<&str, (f64, usize, HashSet<&str>)> = HashMap::new();
    for txn in transactions {
        let entry = by_customer
            .entry(txn.customer_id.as_str())
            .or_insert_with(|| (0.0, 0, HashSet::new()));
        entry.0 += txn.revenue();
        entry.1 += 1;
        entry.2.insert(txn.product_name.as_str());
    }

    let mut customers: Vec<CustomerStats> = by_customer
        .into_iter()
        .map(|(customer_id, (total_spent, purchase_count, products))| {
            let mut products_bought: Vec<String> =
                products.into_iter().map(str::to_owned).collect();
            products_bought.sort();
            CustomerStats {
                customer_id: customer_id.to_owned(),
                total_spent,
                purchase_count,
                avg_order_value: if purchase_count > 0 {
                    round2(total_spent / purchase_count as f64)
                } else {
                    0.0
                },
                products_bought,
            }
        })
        .collect();
    customers.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    customers
}

/// Revenue, volume, and distinct buyers per day, oldest day first.
pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailySales> {
    let mut by_date: HashMap<NaiveDate, (f64, usize, HashSet<&str>)> = HashMap::new();
    for txn in transactions {
        let entry = by_date
            .entry(txn.date)
            .or_insert_with(|| (0.0, 0, HashSet::new()));
        entry.0 += txn.revenue();
        entry.1 += 1;
        entry.2.insert(txn.customer_id.as_str());
    }

    let mut days: Vec<DailySales> = by_date
        .into_iter()
        .map(|(date, (total_revenue, transaction_count, customers))| DailySales {
            date,
            total_revenue,
            transaction_count,
            unique_customers: customers.len(),
        })
        .collect();
    days.sort_by_key(|day| day.date);
    days
}

/// The single highest-revenue day, `None` on an empty batch. Ties resolve
/// to the day seen first in the input.
pub fn find_peak_sales_day(transactions: &[Transaction]) -> Option<PeakDay> {
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut days: Vec<(NaiveDate, f64, usize)> = Vec::new();
    for txn in transactions {
        let slot = *index.entry(txn.date).or_insert_with(|| {
            days.push((txn.date, 0.0, 0));
            days.len() - 1
        });
        days[slot].1 += txn.revenue();
        days[slot].2 += 1;
    }

    let mut peak: Option<&(NaiveDate, f64, usize)> = None;
    for day in &days {
        match peak {
            Some(best) if day.1 <= best.1 => {}
            _ => peak = Some(day),
        }
    }
    peak.map(|&(date, revenue, transaction_count)| PeakDay {
        date,
        revenue: round2(revenue),
        transaction_count,
    })
}
