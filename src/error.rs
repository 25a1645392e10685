use thiserror::Error;

/// Errors that can escape the pipeline boundary.
/// Per-record problems never surface here; they are absorbed into counters
/// and logs at the stage that found them. Only genuine I/O failures while
/// writing the output files are fatal to a run.
#[derive(Error, Debug)]
pub enum SalesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SalesError>;
