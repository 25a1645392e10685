use std::collections::HashMap;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::models::{EnrichedTransaction, Product, ProductInfo, Transaction};

/// Default product catalog endpoint. The 109-product limit deliberately
/// leaves some transactions without a catalog match.
pub const DEFAULT_PRODUCTS_URL: &str = "https://dummyjson.com/products?limit=109";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Column row of the enriched output file, in writer field order.
const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "Price",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

/// Source of catalog products. The network client lives behind this seam
/// so the pipeline can run against a canned catalog in tests.
pub trait ProductCatalog {
    /// Every product the catalog knows, or an empty list once retries are
    /// exhausted.
    fn fetch_all_products(&self) -> Vec<Product>;
}

/// Wire payload of the products endpoint.
#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
}

/// DummyJSON-backed catalog client.
pub struct DummyJsonCatalog {
    url: String,
    client: reqwest::blocking::Client,
}

impl DummyJsonCatalog {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn fetch_once(&self) -> reqwest::Result<Vec<Product>> {
        let response = self
            .client
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()?
            .error_for_status()?;
        let payload: ProductsResponse = response.json()?;
        Ok(payload.products)
    }
}

impl ProductCatalog for DummyJsonCatalog {
    /// Timeouts and connection failures are retried on a fixed delay; an
    /// HTTP status or payload error gives up immediately. Either way the
    /// caller only ever sees a product list, possibly empty.
    fn fetch_all_products(&self) -> Vec<Product> {
        for attempt in 1..=MAX_RETRIES {
            match self.fetch_once() {
                Ok(products) => {
                    info!(count = products.len(), "fetched product catalog");
                    return products;
                }
                Err(err) if err.is_timeout() || err.is_connect() => {
                    warn!(attempt, %err, "catalog fetch failed, retrying");
                    thread::sleep(RETRY_DELAY);
                }
                Err(err) => {
                    error!(%err, "catalog fetch failed");
                    return Vec::new();
                }
            }
        }
        error!("failed to fetch products after {MAX_RETRIES} attempts");
        Vec::new()
    }
}

/// Map product id to the catalog fields kept for enrichment.
pub fn create_product_mapping(products: &[Product]) -> HashMap<u32, ProductInfo> {
    products
        .iter()
        .map(|product| {
            (
                product.id,
                ProductInfo {
                    title: product.title.clone(),
                    category: product.category.clone(),
                    brand: product.brand.clone(),
                    rating: product.rating,
                },
            )
        })
        .collect()
}

/// Attach catalog metadata to each transaction by numeric product id.
///
/// Returns matched and unmatched records separately; both carry the full
/// enriched row shape.
pub fn enrich_transactions(
    transactions: &[Transaction],
    mapping: &HashMap<u32, ProductInfo>,
) -> (Vec<EnrichedTransaction>, Vec<EnrichedTransaction>) {
    let mut enriched = Vec::new();
    let mut non_enriched = Vec::new();

    for txn in transactions {
        let info = numeric_product_id(&txn.product_id).and_then(|id| mapping.get(&id));
        match info {
            Some(info) => enriched.push(EnrichedTransaction::matched(txn, info)),
            None => non_enriched.push(EnrichedTransaction::unmatched(txn)),
        }
    }

    info!(
        enriched = enriched.len(),
        non_enriched = non_enriched.len(),
        "enriched sales data"
    );
    (enriched, non_enriched)
}

/// Digits of the product id, e.g. `P101` -> 101. `None` when the id has no
/// digits at all.
fn numeric_product_id(product_id: &str) -> Option<u32> {
    let digits: String = product_id.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Write matched records as a pipe-delimited file under the enriched
/// header. The header row is written even when there are no records.
pub fn write_enriched_file(path: &Path, records: &[EnrichedTransaction]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(ENRICHED_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
