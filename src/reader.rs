use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::{info, warn};

/// Inclusive bounds on the number of data lines a sales file may carry.
pub const MIN_DATA_LINES: usize = 50;
pub const MAX_DATA_LINES: usize = 100;

/// Token marking the column row of a sales file.
const HEADER_PREFIX: &str = "TransactionID|";

/// Encodings tried in order. WHATWG folds the three single-byte names into
/// the windows-1252 decoder; the labels stay distinct so the reported
/// encoding matches the configured ladder.
fn encoding_ladder() -> [(&'static str, &'static Encoding); 4] {
    [
        ("utf-8", UTF_8),
        ("latin-1", WINDOWS_1252),
        ("cp1252", WINDOWS_1252),
        ("iso-8859-1", WINDOWS_1252),
    ]
}

/// Read raw data lines from a pipe-delimited sales file.
///
/// Returns the surviving lines plus the label of the encoding that decoded
/// the file. `(empty, None)` means the file could not be read at all; an
/// empty list with `Some(label)` means the file decoded but failed the
/// 50..=100 data-line bound. Nothing here propagates an error.
pub fn read_sales_lines(path: &Path) -> (Vec<String>, Option<&'static str>) {
    if path.as_os_str().is_empty() {
        warn!("no input path provided");
        return (Vec::new(), None);
    }
    if !path.exists() {
        warn!(path = %path.display(), "sales file not found");
        return (Vec::new(), None);
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read sales file");
            return (Vec::new(), None);
        }
    };

    let Some((text, encoding_used)) = decode_first_success(&bytes) else {
        warn!(path = %path.display(), "could not decode sales file with any known encoding");
        return (Vec::new(), None);
    };

    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(HEADER_PREFIX))
        .map(str::to_owned)
        .collect();

    let count = lines.len();
    if count < MIN_DATA_LINES {
        warn!(count, min = MIN_DATA_LINES, "too few data lines, rejecting file");
        return (Vec::new(), Some(encoding_used));
    }
    if count > MAX_DATA_LINES {
        warn!(count, max = MAX_DATA_LINES, "too many data lines, rejecting file");
        return (Vec::new(), Some(encoding_used));
    }

    info!(count, encoding = encoding_used, "read sales data");
    (lines, Some(encoding_used))
}

/// Try each ladder entry in order and keep the first that decodes without
/// error. First success wins, not best match: a later encoding is never
/// consulted once an earlier one accepts the bytes, even if it mis-decoded
/// multi-byte content.
fn decode_first_success(bytes: &[u8]) -> Option<(String, &'static str)> {
    for (label, encoding) in encoding_ladder() {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return Some((text.into_owned(), label));
        }
    }
    None
}
