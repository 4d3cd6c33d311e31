//! Output log verification
//!
//! Downstream consumers rely on every line of the output log being unique.
//! This scans a log and stops at the first repeated URL.

use crate::output::traits::{OutputError, OutputResult};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Checks that no URL appears twice in the output log at `path`
///
/// Blank lines are skipped and surrounding whitespace is trimmed before
/// comparison.
///
/// # Returns
///
/// * `Ok(usize)` - Number of unique URLs in the file
/// * `Err(OutputError::Duplicate)` - First repeat, with its 1-based line number
/// * `Err(OutputError::Io)` - The file could not be read
pub fn verify_output_log(path: &Path) -> OutputResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut seen = HashSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let url = line.trim();
        if url.is_empty() {
            continue;
        }
        if !seen.insert(url.to_string()) {
            return Err(OutputError::Duplicate {
                line: index + 1,
                url: url.to_string(),
            });
        }
    }

    Ok(seen.len())
}
