mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::{sample_catalog, sample_lines, write_sales_file, StubCatalog};
use sales_analytics::models::FilterCriteria;
use sales_analytics::{run_pipeline, PipelineOptions};
use tempfile::tempdir;

fn options_for(dir: &Path, input: PathBuf, criteria: FilterCriteria) -> PipelineOptions {
    PipelineOptions {
        input,
        enriched_out: dir.join("enriched_sales_data.txt"),
        report_out: dir.join("sales_report.txt"),
        criteria,
        low_stock_threshold: 10,
    }
}

#[test]
fn full_pipeline_end_to_end() {
    let dir = tempdir().unwrap();
    let input = write_sales_file(dir.path(), &sample_lines(50));
    let options = options_for(dir.path(), input, FilterCriteria::default());

    let outcome = run_pipeline(&options, &sample_catalog()).unwrap();

    assert_eq!(outcome.records_read, 50);
    assert_eq!(outcome.parsed, 50);
    assert_eq!(outcome.invalid, 0);
    assert_eq!(outcome.filtered, 50);
    // Catalog ids 100..=104 cover half of the cycling sample products.
    assert_eq!(outcome.enriched, 25);
    assert_eq!(outcome.non_enriched, 25);

    let report = fs::read_to_string(&options.report_out).unwrap();
    for section in [
        "SALES ANALYTICS REPORT",
        "Records Processed: 50",
        "OVERALL SUMMARY",
        "REGION-WISE PERFORMANCE",
        "TOP 5 PRODUCTS",
        "TOP 5 CUSTOMERS",
        "DAILY SALES TREND",
        "PRODUCT PERFORMANCE ANALYSIS",
        "API ENRICHMENT SUMMARY",
        "Success Rate: 50.00%",
    ] {
        assert!(report.contains(section), "report is missing `{section}`");
    }

    let enriched = fs::read_to_string(&options.enriched_out).unwrap();
    let lines: Vec<&str> = enriched.lines().collect();
    assert_eq!(lines.len(), 26);
    assert!(lines[0].starts_with("TransactionID|Date|ProductID|"));
    assert!(lines[1].ends_with("|true"));
}

#[test]
fn filters_remove_matching_records_from_the_outcome() {
    let dir = tempdir().unwrap();
    let input = write_sales_file(dir.path(), &sample_lines(50));
    let criteria = FilterCriteria {
        region: Some("North".to_owned()),
        min_amount: None,
        max_amount: None,
    };
    let options = options_for(dir.path(), input, criteria);

    let outcome = run_pipeline(&options, &sample_catalog()).unwrap();

    // 12 of the 50 sample lines are North; region matches leave the result.
    assert_eq!(outcome.parsed, 50);
    assert_eq!(outcome.filtered, 38);
    assert_eq!(outcome.invalid, 0);
}

#[test]
fn undersized_file_still_produces_both_outputs() {
    let dir = tempdir().unwrap();
    let input = write_sales_file(dir.path(), &sample_lines(10));
    let options = options_for(dir.path(), input, FilterCriteria::default());

    let outcome = run_pipeline(&options, &StubCatalog { products: Vec::new() }).unwrap();

    assert_eq!(outcome.records_read, 0);
    assert_eq!(outcome.parsed, 0);
    assert_eq!(outcome.enriched, 0);

    let report = fs::read_to_string(&options.report_out).unwrap();
    assert!(report.contains("Records Processed: 0"));
    let date_line = report.lines().find(|l| l.starts_with("Date Range:")).unwrap();
    assert!(date_line.ends_with("N/A"));
    let best_line = report
        .lines()
        .find(|l| l.starts_with("Best Selling Day:"))
        .unwrap();
    assert!(best_line.ends_with("N/A"));
    assert!(report.contains("Products Not Enriched: None"));

    let enriched = fs::read_to_string(&options.enriched_out).unwrap();
    assert_eq!(enriched.lines().count(), 1);
}

#[test]
fn invalid_lines_are_dropped_but_the_run_continues() {
    let dir = tempdir().unwrap();
    let mut lines = sample_lines(50);
    lines[10] = "T011|2024-12-01|P101|Laptop|0|100.0|C001|North".to_owned();
    lines[20] = "not a record at all".to_owned();
    let input = write_sales_file(dir.path(), &lines);
    let options = options_for(dir.path(), input, FilterCriteria::default());

    let outcome = run_pipeline(&options, &sample_catalog()).unwrap();

    assert_eq!(outcome.records_read, 50);
    assert_eq!(outcome.parsed, 48);
    assert_eq!(outcome.enriched + outcome.non_enriched, 48);
}
