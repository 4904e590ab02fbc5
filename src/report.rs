//! Human-readable session report

use crate::models::{CaseResult, SessionReport};
use crate::utils::format_milliseconds;

/// Render one case result as a block of text
pub fn render_case(result: &CaseResult) -> String {
    let mut lines = vec![format!("[Case {}]", result.case_id)];

    match (&result.error, result.verdict) {
        (Some(error), _) => {
            lines.push(format!("  Error: {}", error.trim_end()));
        }
        (None, Some(verdict)) => {
            lines.push(format!(
                "  Verdict: {}",
                if verdict { "True" } else { "False" }
            ));
            if !verdict {
                lines.push("  Actual output:".to_string());
                lines.push(result.actual_output.clone().unwrap_or_default());
                lines.push("  Expected output:".to_string());
                lines.push(result.expected_output.clone().unwrap_or_default());
                if !result.diff.is_empty() {
                    lines.push("  Diff:".to_string());
                    lines.extend(result.diff.iter().map(|line| format!("    {}", line)));
                }
            }
        }
        (None, None) => lines.push("  Verdict: unavailable".to_string()),
    }

    if let Some(elapsed_ms) = result.elapsed_ms {
        lines.push(format!("  Time: {}", format_milliseconds(elapsed_ms)));
    }

    lines.join("\n")
}

/// Render every case followed by the score line
pub fn render_session(report: &SessionReport) -> String {
    let mut out = String::new();

    for result in &report.results {
        out.push_str(&render_case(result));
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "Score: {} ({:.1}%)\n",
        report.score,
        report.score.ratio() * 100.0
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::line_diff;
    use crate::models::CaseFailure;
    use crate::toolchain::Language;
    use std::path::PathBuf;
    use uuid::Uuid;

    #[test]
    fn test_render_passed_case() {
        let result = CaseResult::completed(1, true, "5".into(), "5".into(), Vec::new(), Some(12));
        assert_eq!(render_case(&result), "[Case 1]\n  Verdict: True\n  Time: 12ms");
    }

    #[test]
    fn test_render_wrong_answer_with_diff() {
        let result = CaseResult::completed(2, false, "5".into(), "6".into(), line_diff("6", "5"), None);
        let text = render_case(&result);

        assert!(text.starts_with("[Case 2]\n  Verdict: False\n"));
        assert!(text.contains("  Actual output:\n5\n"));
        assert!(text.contains("  Expected output:\n6\n"));
        assert!(text.ends_with("  Diff:\n    - 6\n    + 5"));
    }

    #[test]
    fn test_render_failure() {
        let result = CaseResult::failed(3, CaseFailure::Build("main.c:1: error\n".into()), None);
        assert_eq!(
            render_case(&result),
            "[Case 3]\n  Error: Compilation error:\nmain.c:1: error"
        );
    }

    #[test]
    fn test_render_session_score() {
        let report = SessionReport::new(
            Uuid::new_v4(),
            PathBuf::from("/src/main.c"),
            Language::C,
            vec![
                CaseResult::completed(1, true, "5".into(), "5".into(), Vec::new(), None),
                CaseResult::completed(2, false, "5".into(), "6".into(), Vec::new(), None),
            ],
        );

        let text = render_session(&report);
        assert!(text.starts_with("[Case 1]"));
        assert!(text.ends_with("Score: 1 / 2 (50.0%)\n"));
    }

    #[test]
    fn test_render_empty_session() {
        let report = SessionReport::new(Uuid::new_v4(), PathBuf::from("main.py"), Language::Python, Vec::new());
        assert_eq!(render_session(&report), "Score: 0 / 0 (0.0%)\n");
    }
}
