use tracing::{info, warn};

use crate::models::{FilterCriteria, FilterSummary, Transaction};

/// Validate and optionally filter parsed transactions.
///
/// Stage A re-checks structure independent of what the parser accepted.
/// Stage B applies the requested region/amount predicates; a record that
/// matches a predicate is removed at that stage, and the result is
/// whatever matched neither. Downstream counts rely on this complement
/// semantics (see DESIGN.md).
pub fn validate_and_filter(
    transactions: &[Transaction],
    criteria: &FilterCriteria,
) -> (Vec<Transaction>, usize, FilterSummary) {
    let total_input = transactions.len();

    let mut valid = Vec::with_capacity(total_input);
    let mut invalid = 0usize;
    for txn in transactions {
        if is_structurally_valid(txn) {
            valid.push(txn.clone());
        } else {
            invalid += 1;
            warn!(id = %txn.transaction_id, "dropping structurally invalid transaction");
        }
    }

    if criteria.is_empty() {
        let summary = FilterSummary {
            total_input,
            invalid,
            filtered_by_region: 0,
            filtered_by_amount: 0,
            final_count: valid.len(),
        };
        return (valid, invalid, summary);
    }

    // Region predicate first. Matches are taken out here and never reach
    // the amount stage.
    let (region_matches, remaining): (Vec<_>, Vec<_>) = match &criteria.region {
        Some(region) => valid
            .into_iter()
            .partition(|txn| txn.region.eq_ignore_ascii_case(region)),
        None => (Vec::new(), valid),
    };

    let (amount_matches, leftover): (Vec<_>, Vec<_>) = remaining
        .into_iter()
        .partition(|txn| matches_amount(txn.revenue(), criteria.min_amount, criteria.max_amount));

    let summary = FilterSummary {
        total_input,
        invalid,
        filtered_by_region: region_matches.len(),
        filtered_by_amount: amount_matches.len(),
        final_count: leftover.len(),
    };
    info!(?summary, "filter pass complete");
    (leftover, invalid, summary)
}

/// Stage A checks: every id carries its prefix, quantity and price are
/// positive. Field presence needs no check; the type itself guarantees it.
fn is_structurally_valid(txn: &Transaction) -> bool {
    txn.quantity > 0
        && txn.price > 0.0
        && txn.transaction_id.starts_with('T')
        && txn.customer_id.starts_with('C')
        && txn.product_id.starts_with('P')
}

/// Amount predicate: inclusive range when both bounds are present, one
/// bound alone compares on that side only, no bounds matches nothing.
fn matches_amount(amount: f64, min: Option<f64>, max: Option<f64>) -> bool {
    match (min, max) {
        (Some(min), Some(max)) => amount >= min && amount <= max,
        (Some(min), None) => amount >= min,
        (None, Some(max)) => amount <= max,
        (None, None) => false,
    }
}
