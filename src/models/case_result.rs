//! Per-case outcomes and session aggregation

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::judge::diff::DiffLine;
use crate::toolchain::Language;

/// A failure that ends one case's pipeline without affecting the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CaseFailure {
    /// Compiler exited non-zero; holds its diagnostics verbatim
    #[error("Compilation error:\n{0}")]
    Build(String),

    /// Execution exceeded the budget; output is discarded
    #[error("Time limit exceeded ({} ms)", .0.as_millis())]
    Timeout(Duration),

    /// Program exited non-zero or could not be started
    #[error("Runtime error:\n{0}")]
    Runtime(String),

    /// Expected or actual output could not be read
    #[error("Comparison failed: {0}")]
    Comparison(String),
}

impl CaseFailure {
    /// Get short code for the failure kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::Build(_) => "BUILD_FAILURE",
            Self::Timeout(_) => "TIMEOUT_FAILURE",
            Self::Runtime(_) => "RUNTIME_FAILURE",
            Self::Comparison(_) => "COMPARISON_FAILURE",
        }
    }
}

/// Coarse status of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    BuildFailure,
    /// Covers both non-zero exits and timeouts
    RuntimeFailure,
    /// The program ran to completion; the verdict may still be absent if
    /// comparison could not read its inputs
    Completed,
}

impl From<&CaseFailure> for CaseStatus {
    fn from(failure: &CaseFailure) -> Self {
        match failure {
            CaseFailure::Build(_) => CaseStatus::BuildFailure,
            CaseFailure::Timeout(_) | CaseFailure::Runtime(_) => CaseStatus::RuntimeFailure,
            CaseFailure::Comparison(_) => CaseStatus::Completed,
        }
    }
}

/// Result of grading a single case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    pub case_id: u64,
    /// False when any step failed, including comparison
    pub success: bool,
    pub status: CaseStatus,
    /// `None` unless comparison actually happened
    pub verdict: Option<bool>,
    pub actual_output: Option<String>,
    pub expected_output: Option<String>,
    pub error: Option<String>,
    pub failure: Option<CaseFailure>,
    /// Removed/inserted lines; empty unless the verdict is false
    pub diff: Vec<DiffLine>,
    /// Wall-clock time of the execution step, when it ran
    pub elapsed_ms: Option<u64>,
}

impl CaseResult {
    /// Create a result for a case that reached a verdict
    pub fn completed(
        case_id: u64,
        verdict: bool,
        actual_output: String,
        expected_output: String,
        diff: Vec<DiffLine>,
        elapsed_ms: Option<u64>,
    ) -> Self {
        Self {
            case_id,
            success: true,
            status: CaseStatus::Completed,
            verdict: Some(verdict),
            actual_output: Some(actual_output),
            expected_output: Some(expected_output),
            error: None,
            failure: None,
            diff,
            elapsed_ms,
        }
    }

    /// Create a result for a case that stopped at `failure`
    pub fn failed(case_id: u64, failure: CaseFailure, elapsed_ms: Option<u64>) -> Self {
        Self {
            case_id,
            success: false,
            status: CaseStatus::from(&failure),
            verdict: None,
            actual_output: None,
            expected_output: None,
            error: Some(failure.to_string()),
            failure: Some(failure),
            diff: Vec::new(),
            elapsed_ms,
        }
    }

    /// Whether the pipeline finished without any failure
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Whether the case counts towards the score
    pub fn passed(&self) -> bool {
        self.verdict == Some(true)
    }
}

/// Passed cases over attempted cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionScore {
    pub passed: usize,
    pub attempted: usize,
}

impl SessionScore {
    pub fn from_results(results: &[CaseResult]) -> Self {
        Self {
            passed: results.iter().filter(|r| r.passed()).count(),
            attempted: results.len(),
        }
    }

    /// Fraction of passed cases; 0.0 when nothing was attempted
    pub fn ratio(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.passed as f64 / self.attempted as f64
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.attempted > 0 && self.passed == self.attempted
    }
}

impl fmt::Display for SessionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.passed, self.attempted)
    }
}

/// Everything a grading session produced
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub source: PathBuf,
    pub language: Language,
    pub results: Vec<CaseResult>,
    pub score: SessionScore,
}

impl SessionReport {
    pub fn new(session_id: Uuid, source: PathBuf, language: Language, results: Vec<CaseResult>) -> Self {
        let score = SessionScore::from_results(&results);
        Self {
            session_id,
            source,
            language,
            results,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passed(case_id: u64) -> CaseResult {
        CaseResult::completed(case_id, true, "5".into(), "5".into(), Vec::new(), Some(3))
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CaseStatus::from(&CaseFailure::Build("x".into())),
            CaseStatus::BuildFailure
        );
        assert_eq!(
            CaseStatus::from(&CaseFailure::Timeout(Duration::from_secs(5))),
            CaseStatus::RuntimeFailure
        );
        assert_eq!(
            CaseStatus::from(&CaseFailure::Comparison("missing".into())),
            CaseStatus::Completed
        );
    }

    #[test]
    fn test_failed_has_no_verdict() {
        let result = CaseResult::failed(2, CaseFailure::Build("main.c:1: error".into()), None);
        assert_eq!(result.status, CaseStatus::BuildFailure);
        assert_eq!(result.verdict, None);
        assert!(!result.is_success());
        assert!(!result.passed());
        assert!(result.error.unwrap().contains("main.c:1: error"));
    }

    #[test]
    fn test_timeout_message() {
        let failure = CaseFailure::Timeout(Duration::from_millis(1500));
        assert_eq!(failure.to_string(), "Time limit exceeded (1500 ms)");
        assert_eq!(failure.code(), "TIMEOUT_FAILURE");
    }

    #[test]
    fn test_score() {
        let results = vec![
            passed(1),
            CaseResult::completed(2, false, "5".into(), "6".into(), Vec::new(), Some(2)),
            CaseResult::failed(3, CaseFailure::Runtime("boom".into()), Some(1)),
            passed(4),
        ];
        let score = SessionScore::from_results(&results);
        assert_eq!(score.passed, 2);
        assert_eq!(score.attempted, 4);
        assert_eq!(score.ratio(), 0.5);
        assert!(!score.is_perfect());
        assert_eq!(score.to_string(), "2 / 4");
    }

    #[test]
    fn test_empty_score() {
        let score = SessionScore::from_results(&[]);
        assert_eq!(score.ratio(), 0.0);
        assert!(!score.is_perfect());
    }

    #[test]
    fn test_success_flag_is_serialized() {
        let ok = serde_json::to_value(passed(1)).unwrap();
        assert_eq!(ok["success"], true);

        let unreadable = CaseResult::failed(2, CaseFailure::Comparison("missing".into()), Some(4));
        let json = serde_json::to_value(&unreadable).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["status"], "completed");
        assert!(json["verdict"].is_null());
    }

    #[test]
    fn test_failure_serializes_with_kind() {
        let json = serde_json::to_value(CaseFailure::Runtime("segfault".into())).unwrap();
        assert_eq!(json["kind"], "runtime");
        assert_eq!(json["detail"], "segfault");
    }
}
