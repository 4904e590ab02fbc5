//! Python language toolchain

use super::{Invocation, Language, ToolchainPlan};
use crate::config::ToolchainConfig;
use crate::models::SourceUnit;

/// Get plan for Python
pub fn plan(source: &SourceUnit, tools: &ToolchainConfig) -> ToolchainPlan {
    ToolchainPlan {
        language: Language::Python,
        compile: None,
        run: Invocation::new(&tools.python).arg(source.path()),
        artifact: None,
    }
}
