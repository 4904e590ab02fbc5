//! Java language toolchain

use std::path::Path;

use super::{ExecutionArtifact, Invocation, Language, ToolchainPlan};
use crate::config::ToolchainConfig;
use crate::models::SourceUnit;

/// Get plan for Java
///
/// Classes are emitted into the work dir and the launcher is pointed at it
/// with `-cp`, so the public class must be named after the file stem.
pub fn plan(source: &SourceUnit, tools: &ToolchainConfig, work_dir: &Path) -> ToolchainPlan {
    let class_name = source.stem().to_string();

    ToolchainPlan {
        language: Language::Java,
        compile: Some(
            Invocation::new(&tools.javac)
                .arg("-d")
                .arg(work_dir)
                .arg(source.path()),
        ),
        run: Invocation::new(&tools.java)
            .arg("-cp")
            .arg(work_dir)
            .arg(&class_name),
        artifact: Some(ExecutionArtifact::Classes {
            dir: work_dir.to_path_buf(),
            class_name,
        }),
    }
}
