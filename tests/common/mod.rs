use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sales_analytics::enrichment::ProductCatalog;
use sales_analytics::models::{Product, Transaction};

/// Build a transaction field by field.
#[allow(clippy::too_many_arguments)]
pub fn make_transaction(
    transaction_id: &str,
    date: &str,
    product_id: &str,
    product_name: &str,
    quantity: u32,
    price: f64,
    customer_id: &str,
    region: &str,
) -> Transaction {
    Transaction {
        transaction_id: transaction_id.to_owned(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        product_id: product_id.to_owned(),
        product_name: product_name.to_owned(),
        quantity,
        price,
        customer_id: customer_id.to_owned(),
        region: region.to_owned(),
    }
}

/// Shorthand for the fields most tests vary.
pub fn make_sale(id: &str, product: &str, quantity: u32, price: f64, region: &str) -> Transaction {
    make_transaction(
        id,
        "2024-12-01",
        "P101",
        product,
        quantity,
        price,
        "C001",
        region,
    )
}

/// Deterministic valid data lines with cycling products, regions, dates,
/// and customers.
pub fn sample_lines(count: usize) -> Vec<String> {
    const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
    (1..=count)
        .map(|i| {
            let product = 100 + (i % 10);
            format!(
                "T{i:03}|2024-12-{day:02}|P{product}|Product {product}|{qty}|{price:.1}|C{customer:03}|{region}",
                day = (i % 28) + 1,
                qty = (i % 5) + 1,
                price = (((i % 4) + 1) * 250) as f64,
                customer = (i % 7) + 1,
                region = REGIONS[i % 4],
            )
        })
        .collect()
}

/// Write a sales file (with header row) into `dir` and return its path.
pub fn write_sales_file(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("sales_data.txt");
    let mut content = String::from(
        "TransactionID|Date|ProductID|ProductName|Quantity|Price|CustomerID|Region\n",
    );
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

/// Catalog stub returning a fixed product list, no network involved.
pub struct StubCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog for StubCatalog {
    fn fetch_all_products(&self) -> Vec<Product> {
        self.products.clone()
    }
}

/// Build a catalog product.
pub fn make_product(
    id: u32,
    title: &str,
    category: &str,
    brand: Option<&str>,
    rating: f64,
) -> Product {
    Product {
        id,
        title: title.to_owned(),
        category: category.to_owned(),
        brand: brand.map(str::to_owned),
        price: 100.0,
        rating,
    }
}

/// Catalog knowing product ids 100..=104; sample lines carrying P105..P109
/// stay unmatched.
pub fn sample_catalog() -> StubCatalog {
    StubCatalog {
        products: (100..=104)
            .map(|id| {
                make_product(
                    id,
                    &format!("Product {id}"),
                    "electronics",
                    Some("Acme"),
                    4.5,
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_sale() {
        let txn = make_sale("T001", "Laptop", 2, 45000.0, "North");
        assert_eq!(txn.transaction_id, "T001");
        assert_eq!(txn.quantity, 2);
        assert_eq!(txn.revenue(), 90000.0);
    }

    #[test]
    fn test_sample_lines_shape() {
        let lines = sample_lines(50);
        assert_eq!(lines.len(), 50);
        assert!(lines.iter().all(|line| line.split('|').count() == 8));
    }
}
