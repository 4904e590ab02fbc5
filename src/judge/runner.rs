//! Case runner
//!
//! Drives each case through `Discovered -> Building -> Executing ->
//! Comparing -> Reclaimed`. A failure at any step jumps straight to
//! `Reclaimed`. Cases run one at a time in ascending id order, and a case's
//! artifacts are gone before the next case starts building.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;
use uuid::Uuid;

use super::build::build;
use super::comparator::compare;
use super::discovery::discover_cases;
use super::executor::execute;
use super::reclaimer::CaseArtifacts;
use crate::config::{GradingConfig, ToolchainConfig};
use crate::constants::{case_files, WORK_DIR_PREFIX};
use crate::error::{GradeError, GradeResult};
use crate::models::{CaseResult, SessionReport, SourceUnit, TestCase};
use crate::toolchain::{Language, ToolchainPlan};

/// Where a case is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStage {
    Discovered,
    Building,
    Executing,
    Comparing,
    Reclaimed,
}

impl CaseStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStage::Discovered => "discovered",
            CaseStage::Building => "building",
            CaseStage::Executing => "executing",
            CaseStage::Comparing => "comparing",
            CaseStage::Reclaimed => "reclaimed",
        }
    }
}

impl fmt::Display for CaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One grading session for one source unit.
///
/// Owns a private work directory that holds build artifacts and per-case
/// output files. The directory is removed when the grader is dropped.
#[derive(Debug)]
pub struct Grader {
    session_id: Uuid,
    source: SourceUnit,
    plan: ToolchainPlan,
    config: GradingConfig,
    work_dir: TempDir,
}

impl Grader {
    /// Start a session. Fails with [`GradeError::UnsupportedLanguage`] before
    /// anything is created on disk if the source has no toolchain.
    pub fn new(
        source: SourceUnit,
        tools: &ToolchainConfig,
        config: GradingConfig,
    ) -> GradeResult<Self> {
        let language = Language::from_extension(source.extension())?;

        let session_id = Uuid::new_v4();
        let parent = config
            .work_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&parent)?;

        let work_dir = tempfile::Builder::new()
            .prefix(&format!("{}{}-", WORK_DIR_PREFIX, session_id))
            .tempdir_in(&parent)?;

        let plan = ToolchainPlan::resolve(&source, tools, work_dir.path())?;

        tracing::info!(
            session_id = %session_id,
            language = %language,
            source = %source.path().display(),
            work_dir = %work_dir.path().display(),
            "Grading session started"
        );

        Ok(Self {
            session_id,
            source,
            plan,
            config,
            work_dir,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn source(&self) -> &SourceUnit {
        &self.source
    }

    pub fn plan(&self) -> &ToolchainPlan {
        &self.plan
    }

    /// Session work directory
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Discover every case in the configured directory and grade them all
    pub async fn run_all(&self) -> GradeResult<SessionReport> {
        let cases = discover_cases(&self.config.case_dir)?;
        Ok(self.run_cases(&cases).await)
    }

    /// Grade a single case from the configured directory by its id
    pub async fn run_case_by_id(&self, id: u64) -> GradeResult<CaseResult> {
        let cases = discover_cases(&self.config.case_dir)?;
        let case = cases
            .iter()
            .find(|case| case.id == id)
            .ok_or(GradeError::CaseNotFound(id))?;

        Ok(self.run_case(case).await)
    }

    /// Grade `cases` strictly in order and aggregate the score
    #[tracing::instrument(skip_all, fields(session_id = %self.session_id, cases = cases.len()))]
    pub async fn run_cases(&self, cases: &[TestCase]) -> SessionReport {
        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            results.push(self.run_case(case).await);
        }

        let report = SessionReport::new(
            self.session_id,
            self.source.path().to_path_buf(),
            self.plan.language,
            results,
        );

        tracing::info!(
            passed = report.score.passed,
            attempted = report.score.attempted,
            "Grading session finished"
        );

        report
    }

    /// Run one case end to end. Never fails: every failure is recorded in
    /// the returned result, and the case's files are reclaimed regardless.
    #[tracing::instrument(skip_all, fields(case_id = case.id))]
    pub async fn run_case(&self, case: &TestCase) -> CaseResult {
        tracing::debug!(stage = %CaseStage::Discovered, "Case stage");

        let artifacts = CaseArtifacts::new(self.output_path(case.id), self.plan.artifact.clone());
        let result = self.drive(case, &artifacts).await;

        let stats = artifacts.reclaim();
        tracing::debug!(
            stage = %CaseStage::Reclaimed,
            files_deleted = stats.files_deleted,
            bytes_freed = stats.bytes_freed,
            "Case stage"
        );
        if stats.errors > 0 {
            tracing::warn!(errors = stats.errors, "Some case artifacts could not be removed");
        }

        match &result.failure {
            None => tracing::info!(
                verdict = result.verdict,
                elapsed_ms = result.elapsed_ms,
                "Case graded"
            ),
            Some(failure) => tracing::info!(
                failure = failure.code(),
                elapsed_ms = result.elapsed_ms,
                "Case failed"
            ),
        }

        result
    }

    async fn drive(&self, case: &TestCase, artifacts: &CaseArtifacts) -> CaseResult {
        tracing::debug!(stage = %CaseStage::Building, "Case stage");
        if let Err(failure) = build(&self.plan, self.config.build_timeout).await {
            return CaseResult::failed(case.id, failure, None);
        }

        tracing::debug!(stage = %CaseStage::Executing, "Case stage");
        let start = Instant::now();
        let executed = execute(
            &self.plan.run,
            &case.input_path,
            artifacts.output_path(),
            self.config.time_budget,
        )
        .await;
        let elapsed_ms = Some(start.elapsed().as_millis() as u64);

        match executed {
            Ok(output) if !output.stderr.trim().is_empty() => {
                tracing::debug!(stderr = %output.stderr.trim_end(), "Program wrote to stderr");
            }
            Ok(_) => {}
            Err(failure) => return CaseResult::failed(case.id, failure, elapsed_ms),
        }

        tracing::debug!(stage = %CaseStage::Comparing, "Case stage");
        match compare(
            artifacts.output_path(),
            &case.expected_path,
            self.config.show_diff,
        )
        .await
        {
            Ok(comparison) => CaseResult::completed(
                case.id,
                comparison.verdict,
                comparison.actual,
                comparison.expected,
                comparison.diff,
                elapsed_ms,
            ),
            Err(failure) => CaseResult::failed(case.id, failure, elapsed_ms),
        }
    }

    /// Actual-output file for a case, inside the session work dir
    fn output_path(&self, id: u64) -> PathBuf {
        self.work_dir.path().join(format!(
            "{}{}.{}",
            case_files::ACTUAL_PREFIX,
            id,
            case_files::EXTENSION
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CaseStatus;
    use crate::toolchain::Invocation;
    use std::time::Duration;

    /// Toolchain whose "python" is the POSIX shell, so `.py` sources are
    /// shell scripts
    fn shell_tools() -> ToolchainConfig {
        ToolchainConfig {
            python: "sh".to_string(),
            ..ToolchainConfig::default()
        }
    }

    fn config(case_dir: &Path, work_dir: &Path) -> GradingConfig {
        GradingConfig {
            time_budget: Duration::from_secs(5),
            build_timeout: Duration::from_secs(10),
            case_dir: case_dir.to_path_buf(),
            work_dir: Some(work_dir.to_path_buf()),
            show_diff: true,
        }
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(CaseStage::Executing.to_string(), "executing");
        assert_eq!(CaseStage::Reclaimed.to_string(), "reclaimed");
    }

    #[test]
    fn test_unsupported_language_creates_no_work_dir() {
        let root = tempfile::tempdir().unwrap();
        let work = root.path().join("work");
        let source = SourceUnit::new(root.path().join("main.rb")).unwrap();

        let err = Grader::new(source, &shell_tools(), config(root.path(), &work)).unwrap_err();
        assert!(matches!(err, GradeError::UnsupportedLanguage(_)));
        assert!(!work.exists());
    }

    #[test]
    fn test_work_dir_is_session_scoped() {
        let root = tempfile::tempdir().unwrap();
        let source_path = write(root.path(), "main.py", "cat");
        let source = SourceUnit::new(source_path).unwrap();

        let grader = Grader::new(source, &shell_tools(), config(root.path(), root.path())).unwrap();
        let work_dir = grader.work_dir().to_path_buf();
        let name = work_dir.file_name().unwrap().to_string_lossy().into_owned();

        assert!(name.starts_with(&format!("casejudge-{}-", grader.session_id())));
        assert!(work_dir.is_dir());

        drop(grader);
        assert!(!work_dir.exists());
    }

    #[tokio::test]
    async fn test_run_case_reclaims_output() {
        let root = tempfile::tempdir().unwrap();
        let source = SourceUnit::new(write(root.path(), "main.py", "read a b; echo $((a + b))")).unwrap();
        let input = write(root.path(), "input1.txt", "2 3\n");
        let expected = write(root.path(), "output1.txt", "5\n");

        let grader = Grader::new(source, &shell_tools(), config(root.path(), root.path())).unwrap();
        let result = grader.run_case(&TestCase::new(1, input, expected)).await;

        assert_eq!(result.status, CaseStatus::Completed);
        assert_eq!(result.verdict, Some(true));
        assert!(result.elapsed_ms.is_some());
        assert!(!grader.work_dir().join("actual1.txt").exists());
    }

    #[tokio::test]
    async fn test_run_case_by_id() {
        let root = tempfile::tempdir().unwrap();
        let cases = root.path().join("cases");
        std::fs::create_dir(&cases).unwrap();
        write(&cases, "input4.txt", "hello\n");
        write(&cases, "output4.txt", "hello");
        let source = SourceUnit::new(write(root.path(), "main.py", "cat")).unwrap();

        let grader = Grader::new(source, &shell_tools(), config(&cases, root.path())).unwrap();

        let result = grader.run_case_by_id(4).await.unwrap();
        assert_eq!(result.case_id, 4);
        assert!(result.passed());

        let err = grader.run_case_by_id(5).await.unwrap_err();
        assert!(matches!(err, GradeError::CaseNotFound(5)));
    }

    #[tokio::test]
    async fn test_missing_expected_is_null_verdict() {
        let root = tempfile::tempdir().unwrap();
        let source = SourceUnit::new(write(root.path(), "main.py", "cat")).unwrap();
        let input = write(root.path(), "input1.txt", "x\n");

        let grader = Grader::new(source, &shell_tools(), config(root.path(), root.path())).unwrap();
        let result = grader
            .run_case(&TestCase::new(1, input, root.path().join("output1.txt")))
            .await;

        assert_eq!(result.status, CaseStatus::Completed);
        assert_eq!(result.verdict, None);
        assert_eq!(result.failure.as_ref().map(|f| f.code()), Some("COMPARISON_FAILURE"));
    }

    #[tokio::test]
    async fn test_every_class_file_is_reclaimed() {
        let root = tempfile::tempdir().unwrap();
        let source = SourceUnit::new(write(root.path(), "Main.java", "class Main {}")).unwrap();
        let input = write(root.path(), "input1.txt", "");
        let expected = write(root.path(), "output1.txt", "");

        let mut grader =
            Grader::new(source, &ToolchainConfig::default(), config(root.path(), root.path())).unwrap();
        // Stand-in compiler emitting what javac would for a nested and a second top-level class
        grader.plan.compile = Some(
            Invocation::new("sh")
                .arg("-c")
                .arg("cd \"$1\" && touch Main.class 'Main$Node.class' FastReader.class")
                .arg("sh")
                .arg(grader.work_dir()),
        );
        grader.plan.run = Invocation::new("true");

        let result = grader.run_case(&TestCase::new(1, input, expected)).await;

        assert_eq!(result.verdict, Some(true));
        assert!(std::fs::read_dir(grader.work_dir()).unwrap().next().is_none());
    }
}
