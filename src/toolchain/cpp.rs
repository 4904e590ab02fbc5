//! C++ language toolchain

use std::path::Path;

use super::{ExecutionArtifact, Invocation, Language, ToolchainPlan};
use crate::config::ToolchainConfig;
use crate::models::SourceUnit;

/// Get plan for C++
pub fn plan(source: &SourceUnit, tools: &ToolchainConfig, work_dir: &Path) -> ToolchainPlan {
    let artifact = ExecutionArtifact::binary(work_dir, source.stem());
    let binary = artifact.primary_path();

    ToolchainPlan {
        language: Language::Cpp,
        compile: Some(
            Invocation::new(&tools.cxx)
                .arg(source.path())
                .arg("-o")
                .arg(&binary),
        ),
        run: Invocation::new(&binary),
        artifact: Some(artifact),
    }
}
