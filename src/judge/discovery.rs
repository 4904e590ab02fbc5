//! Case discovery
//!
//! Scans a case directory for `input<N>.txt` files and pairs each with
//! `output<N>.txt`. The digit string is kept verbatim when building the
//! expected path, so `input03.txt` pairs with `output03.txt`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::constants::case_files;
use crate::error::{GradeError, GradeResult};
use crate::models::TestCase;

static INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(case_files::INPUT_PATTERN).expect("input pattern is a valid regex")
});

/// Find all cases in `dir`, sorted by ascending numeric id
pub fn discover_cases(dir: &Path) -> GradeResult<Vec<TestCase>> {
    if !dir.is_dir() {
        return Err(GradeError::CaseDirectory(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut cases = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Error reading directory entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        let Some(case) = parse_case(dir, name) else {
            if name.starts_with("input") {
                tracing::debug!(file = name, "Skipping input file without a numeric id");
            }
            continue;
        };

        cases.push(case);
    }

    cases.sort_by_key(|case| case.id);

    tracing::info!(count = cases.len(), dir = %dir.display(), "Discovered test cases");

    Ok(cases)
}

/// Build a case from an input file name, if it carries a parseable id
fn parse_case(dir: &Path, file_name: &str) -> Option<TestCase> {
    let captures = INPUT_RE.captures(file_name)?;
    let digits = captures.get(1)?.as_str();
    let id: u64 = digits.parse().ok()?;

    let expected_name = format!(
        "{}{}.{}",
        case_files::EXPECTED_PREFIX,
        digits,
        case_files::EXTENSION
    );

    Some(TestCase::new(id, dir.join(file_name), dir.join(expected_name)))
}
