pub mod product;
pub mod transaction;

pub use product::{EnrichedTransaction, Product, ProductInfo};
pub use transaction::{FilterCriteria, FilterSummary, Transaction};
