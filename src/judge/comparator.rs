//! Verdict comparator
//!
//! **Normalization rules:**
//! - `\r\n` and lone `\r` line endings are read as `\n`
//! - Leading and trailing whitespace of the whole output is stripped
//! - Interior whitespace, blank lines and case are preserved
//! - Comparison is exact equality of the normalized text

use std::path::Path;

use tokio::fs;

use super::diff::{line_diff, DiffLine};
use crate::models::CaseFailure;

/// Outcome of a successful comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub verdict: bool,
    /// Normalized actual output
    pub actual: String,
    /// Normalized expected output
    pub expected: String,
    /// Empty when the verdict is true or diffs are disabled
    pub diff: Vec<DiffLine>,
}

/// Normalize output for comparison
pub fn normalize(output: &str) -> &str {
    output.trim()
}

/// Compare two in-memory outputs
pub fn compare_text(actual: &str, expected: &str, with_diff: bool) -> Comparison {
    let actual = unify_line_endings(actual);
    let expected = unify_line_endings(expected);
    let actual = normalize(&actual);
    let expected = normalize(&expected);
    let verdict = actual == expected;

    let diff = if !verdict && with_diff {
        line_diff(expected, actual)
    } else {
        Vec::new()
    };

    Comparison {
        verdict,
        actual: actual.to_string(),
        expected: expected.to_string(),
        diff,
    }
}

/// Read both files and compare them. Either file being unreadable is a
/// [`CaseFailure::Comparison`], which leaves the verdict empty rather than
/// false.
pub async fn compare(
    actual_path: &Path,
    expected_path: &Path,
    with_diff: bool,
) -> Result<Comparison, CaseFailure> {
    let actual = read_text(actual_path, "actual output").await?;
    let expected = read_text(expected_path, "expected output").await?;

    Ok(compare_text(&actual, &expected, with_diff))
}

async fn read_text(path: &Path, what: &str) -> Result<String, CaseFailure> {
    let bytes = fs::read(path).await.map_err(|e| {
        CaseFailure::Comparison(format!("Cannot read {} {}: {}", what, path.display(), e))
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Translate `\r\n` and lone `\r` to `\n`
pub fn unify_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::diff::DiffKind;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("hello"), "hello");
        assert_eq!(normalize("  hello  "), "hello");
        assert_eq!(normalize("\nhello\n"), "hello");
        assert_eq!(normalize("a\n\nb\n"), "a\n\nb");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_boundary_whitespace_ignored() {
        let result = compare_text("\n  5 \n\n", "5", true);
        assert!(result.verdict);
        assert_eq!(result.actual, "5");
        assert!(result.diff.is_empty());
    }

    #[test]
    fn test_interior_difference() {
        let result = compare_text("1 2 3\n4 5 6", "1 2 3\n4 5 7", true);
        assert!(!result.verdict);
        assert_eq!(result.diff.len(), 2);
        assert_eq!(result.diff[0].kind, DiffKind::Removed);
        assert_eq!(result.diff[0].text, "4 5 7");
        assert_eq!(result.diff[0].line_number, 2);
        assert_eq!(result.diff[1].kind, DiffKind::Inserted);
        assert_eq!(result.diff[1].text, "4 5 6");
    }

    #[test]
    fn test_interior_whitespace_matters() {
        assert!(!compare_text("1  2", "1 2", false).verdict);
        assert!(!compare_text("a\n\nb", "a\nb", false).verdict);
    }

    #[test]
    fn test_diff_disabled() {
        let result = compare_text("5", "6", false);
        assert!(!result.verdict);
        assert!(result.diff.is_empty());
    }

    #[tokio::test]
    async fn test_compare_files() {
        let dir = tempfile::tempdir().unwrap();
        let actual = dir.path().join("actual1.txt");
        let expected = dir.path().join("output1.txt");
        std::fs::write(&actual, "5\n").unwrap();
        std::fs::write(&expected, "5").unwrap();

        let result = compare(&actual, &expected, true).await.unwrap();
        assert!(result.verdict);
        assert_eq!(result.expected, "5");
    }

    #[test]
    fn test_unify_line_endings() {
        assert_eq!(unify_line_endings("5\r\n6\r\n"), "5\n6\n");
        assert_eq!(unify_line_endings("a\rb\r\nc"), "a\nb\nc");
        assert_eq!(unify_line_endings("plain\n"), "plain\n");
    }

    #[tokio::test]
    async fn test_crlf_expected_matches_lf_output() {
        let dir = tempfile::tempdir().unwrap();
        let actual = dir.path().join("actual1.txt");
        let expected = dir.path().join("output1.txt");
        std::fs::write(&actual, "5\n6\n").unwrap();
        std::fs::write(&expected, "5\r\n6\r\n").unwrap();

        let result = compare(&actual, &expected, true).await.unwrap();
        assert!(result.verdict);
        assert_eq!(result.expected, "5\n6");
    }

    #[tokio::test]
    async fn test_wrong_answer_always_has_diff() {
        let dir = tempfile::tempdir().unwrap();
        let actual = dir.path().join("actual1.txt");
        let expected = dir.path().join("output1.txt");
        let pairs = [
            ("5\n6\n", "5\r\n7\r\n"),
            ("1 2", "1  2"),
            ("a\n\nb", "a\nb"),
            ("x", ""),
        ];

        for (out, exp) in pairs {
            std::fs::write(&actual, out).unwrap();
            std::fs::write(&expected, exp).unwrap();
            let result = compare(&actual, &expected, true).await.unwrap();
            assert!(!result.verdict, "{:?} vs {:?}", out, exp);
            assert!(!result.diff.is_empty(), "{:?} vs {:?}", out, exp);
        }
    }

    #[tokio::test]
    async fn test_missing_expected_file() {
        let dir = tempfile::tempdir().unwrap();
        let actual = dir.path().join("actual1.txt");
        std::fs::write(&actual, "5\n").unwrap();

        let err = compare(&actual, &dir.path().join("output1.txt"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, CaseFailure::Comparison(msg) if msg.contains("expected output")));
    }

    #[tokio::test]
    async fn test_missing_actual_file() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().join("output1.txt");
        std::fs::write(&expected, "5").unwrap();

        let err = compare(&dir.path().join("actual1.txt"), &expected, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CaseFailure::Comparison(msg) if msg.contains("actual output")));
    }
}
