//! Language-specific toolchains for compilation and execution
//!
//! A [`SourceUnit`]'s extension selects a [`Language`], and the language maps
//! through a fixed table to a [`ToolchainPlan`]. Artifact names are derived
//! from the source stem and placed in the session work dir, so rebuilding the
//! same source overwrites the previous artifact rather than adding another.

pub mod c;
pub mod cpp;
pub mod java;
pub mod python;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;

use crate::config::ToolchainConfig;
use crate::constants::{self, artifacts};
use crate::error::{GradeError, GradeResult};
use crate::models::SourceUnit;

/// Supported source languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Java,
    Python,
}

impl Language {
    /// Map a file extension (without the dot) to a language
    pub fn from_extension(extension: &str) -> GradeResult<Self> {
        use constants::file_extensions as ext;

        if ext::C.contains(&extension) {
            Ok(Language::C)
        } else if ext::CPP.contains(&extension) {
            Ok(Language::Cpp)
        } else if ext::JAVA.contains(&extension) {
            Ok(Language::Java)
        } else if ext::PYTHON.contains(&extension) {
            Ok(Language::Python)
        } else if extension.is_empty() {
            Err(GradeError::UnsupportedLanguage(
                "source file has no extension".to_string(),
            ))
        } else {
            Err(GradeError::UnsupportedLanguage(format!(".{}", extension)))
        }
    }

    /// Language identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => constants::languages::C,
            Language::Cpp => constants::languages::CPP,
            Language::Java => constants::languages::JAVA,
            Language::Python => constants::languages::PYTHON,
        }
    }

    /// Whether a build step runs before execution
    pub fn is_compiled(&self) -> bool {
        !matches!(self, Language::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A program plus its argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Build a command with all standard streams nulled; callers rebind what
    /// they need.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    /// Program name for log lines
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Build output that must be removed once a case is finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionArtifact {
    /// Native executable
    Binary(PathBuf),
    /// JVM classes emitted into `dir`. One source may yield several class
    /// files (`Name$Inner.class`, extra top-level classes); every class file
    /// in `dir` belongs to the artifact, so `dir` must be the session work dir.
    Classes { dir: PathBuf, class_name: String },
}

impl ExecutionArtifact {
    /// Native binary named after the stem
    pub fn binary(work_dir: &Path, stem: &str) -> Self {
        ExecutionArtifact::Binary(
            work_dir
                .join(stem)
                .with_extension(artifacts::BINARY_EXTENSION),
        )
    }

    /// Primary file of the artifact
    pub fn primary_path(&self) -> PathBuf {
        match self {
            ExecutionArtifact::Binary(path) => path.clone(),
            ExecutionArtifact::Classes { dir, class_name } => dir
                .join(class_name)
                .with_extension(artifacts::CLASS_EXTENSION),
        }
    }

    /// Every file currently on disk that belongs to this artifact
    pub fn existing_paths(&self) -> Vec<PathBuf> {
        match self {
            ExecutionArtifact::Binary(path) => {
                if path.exists() {
                    vec![path.clone()]
                } else {
                    Vec::new()
                }
            }
            ExecutionArtifact::Classes { dir, .. } => {
                let Ok(entries) = std::fs::read_dir(dir) else {
                    return Vec::new();
                };

                let mut paths: Vec<PathBuf> = entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .filter(|path| {
                        path.is_file()
                            && path
                                .extension()
                                .is_some_and(|e| e == artifacts::CLASS_EXTENSION)
                    })
                    .collect();
                paths.sort();
                paths
            }
        }
    }
}

/// Resolved compile and run recipe for one source unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainPlan {
    pub language: Language,
    pub compile: Option<Invocation>,
    pub run: Invocation,
    pub artifact: Option<ExecutionArtifact>,
}

impl ToolchainPlan {
    /// Resolve the plan for `source`, placing artifacts inside `work_dir`
    pub fn resolve(
        source: &SourceUnit,
        tools: &ToolchainConfig,
        work_dir: &Path,
    ) -> GradeResult<Self> {
        let language = Language::from_extension(source.extension())?;

        let plan = match language {
            Language::C => c::plan(source, tools, work_dir),
            Language::Cpp => cpp::plan(source, tools, work_dir),
            Language::Java => java::plan(source, tools, work_dir),
            Language::Python => python::plan(source, tools),
        };

        tracing::debug!(
            language = %plan.language,
            compile = plan.compile.as_ref().map(|c| c.to_string()),
            run = %plan.run,
            "Resolved toolchain plan"
        );

        Ok(plan)
    }
}
