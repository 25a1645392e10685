use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Product record from the catalog API.
/// `brand` is absent for some upstream categories, so it stays optional.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: u32,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
}

/// Catalog fields retained in the id -> product mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub title: String,
    pub category: String,
    pub brand: Option<String>,
    pub rating: f64,
}

/// One row of the enriched output file.
///
/// Field order matches the enriched-file header exactly; the writer relies
/// on it.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedTransaction {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
    pub customer_id: String,
    pub region: String,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_rating: Option<f64>,
    pub api_match: bool,
}

impl EnrichedTransaction {
    /// Row for a transaction whose product id resolved in the catalog.
    pub fn matched(txn: &Transaction, info: &ProductInfo) -> Self {
        Self {
            transaction_id: txn.transaction_id.clone(),
            date: txn.date,
            product_id: txn.product_id.clone(),
            product_name: txn.product_name.clone(),
            quantity: txn.quantity,
            price: txn.price,
            customer_id: txn.customer_id.clone(),
            region: txn.region.clone(),
            api_category: Some(info.category.clone()),
            api_brand: info.brand.clone(),
            api_rating: Some(info.rating),
            api_match: true,
        }
    }

    /// Row for a transaction the catalog does not know.
    pub fn unmatched(txn: &Transaction) -> Self {
        Self {
            transaction_id: txn.transaction_id.clone(),
            date: txn.date,
            product_id: txn.product_id.clone(),
            product_name: txn.product_name.clone(),
            quantity: txn.quantity,
            price: txn.price,
            customer_id: txn.customer_id.clone(),
            region: txn.region.clone(),
            api_category: None,
            api_brand: None,
            api_rating: None,
            api_match: false,
        }
    }
}
