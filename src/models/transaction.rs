use chrono::NaiveDate;

/// One validated sales record.
///
/// Only the parser builds these from raw input; every later stage treats
/// them as read-only. The date is stored typed, which is also its
/// normalized `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
    pub customer_id: String,
    pub region: String,
}

impl Transaction {
    /// Revenue is always recomputed, never cached on the record.
    pub fn revenue(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// Optional predicates for the second filter stage.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl FilterCriteria {
    /// True when the caller requested no filtering at all.
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.min_amount.is_none() && self.max_amount.is_none()
    }
}

/// Counters produced by one filter invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize,
}
