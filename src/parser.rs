use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::Transaction;

/// Number of pipe-delimited fields a raw record must carry.
const FIELD_COUNT: usize = 8;

/// Date format used for parsing; the stored `NaiveDate` is the normalized
/// form of the same string.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a raw line was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 8 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid date `{0}`")]
    InvalidDate(String),

    #[error("invalid quantity `{0}`")]
    InvalidQuantity(String),

    #[error("invalid price `{0}`")]
    InvalidPrice(String),

    #[error("transaction id `{0}` must start with `T`")]
    BadTransactionId(String),

    #[error("customer id must not be empty")]
    EmptyCustomerId,

    #[error("region must not be empty")]
    EmptyRegion,
}

/// Parse raw pipe-delimited lines into validated transactions.
///
/// Rejected lines are logged and counted; one bad line never aborts the
/// batch. The counters and the derived date range surface through the log
/// only, not the return value.
pub fn parse_transactions(lines: &[String]) -> Vec<Transaction> {
    let mut transactions = Vec::with_capacity(lines.len());
    let mut seen_dates = Vec::new();
    let mut processed = 0usize;
    let mut invalid = 0usize;

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        processed += 1;
        match parse_line(line, &mut seen_dates) {
            Ok(txn) => transactions.push(txn),
            Err(err) => {
                invalid += 1;
                warn!(line = index + 1, %err, "skipping invalid record");
            }
        }
    }

    info!(
        processed,
        invalid,
        valid = transactions.len(),
        date_range = %format_date_range(&seen_dates),
        "parsed sales data"
    );
    transactions
}

/// Apply the validation ladder to one raw line.
///
/// A date that parses is recorded in `seen_dates` even when a later step
/// rejects the line; the batch date range covers those too.
fn parse_line(line: &str, seen_dates: &mut Vec<NaiveDate>) -> Result<Transaction, ParseError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let date = NaiveDate::parse_from_str(fields[1], DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(fields[1].to_owned()))?;
    seen_dates.push(date);

    let product_name = normalize_product_name(fields[3]);
    let quantity = parse_quantity(fields[4])?;
    let price = parse_price(fields[5])?;

    let transaction_id = fields[0];
    if !transaction_id.starts_with('T') {
        return Err(ParseError::BadTransactionId(transaction_id.to_owned()));
    }

    let customer_id = fields[6];
    if customer_id.is_empty() {
        return Err(ParseError::EmptyCustomerId);
    }

    let region = fields[7];
    if region.is_empty() {
        return Err(ParseError::EmptyRegion);
    }

    Ok(Transaction {
        transaction_id: transaction_id.to_owned(),
        date,
        product_id: fields[2].to_owned(),
        product_name,
        quantity,
        price,
        customer_id: customer_id.to_owned(),
        region: region.to_owned(),
    })
}

/// Commas become spaces, then any run of whitespace collapses to one space.
fn normalize_product_name(raw: &str) -> String {
    raw.replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quantity with thousands separators stripped; must be a positive integer.
fn parse_quantity(raw: &str) -> Result<u32, ParseError> {
    let cleaned = raw.replace(',', "");
    match cleaned.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ParseError::InvalidQuantity(raw.to_owned())),
    }
}

/// Price with thousands separators stripped; must be a positive float.
fn parse_price(raw: &str) -> Result<f64, ParseError> {
    let cleaned = raw.replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(value) if value > 0.0 => Ok(value),
        _ => Err(ParseError::InvalidPrice(raw.to_owned())),
    }
}

/// Human-readable range over every date that parsed, `"N/A"` when none did.
pub fn format_date_range(dates: &[NaiveDate]) -> String {
    match (dates.iter().min(), dates.iter().max()) {
        (Some(first), Some(last)) => {
            format!("{} to {}", first.format("%B %Y"), last.format("%B %Y"))
        }
        _ => "N/A".to_owned(),
    }
}
