//! Application configuration management
//!
//! Configuration is loaded from environment variables (and an optional
//! `.env` file) once at startup. CLI flags may override individual values
//! afterwards.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    toolchains, DEFAULT_BUILD_TIMEOUT_MS, DEFAULT_CASE_DIR, DEFAULT_LOG_FILTER,
    DEFAULT_TIME_BUDGET_MS,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub grading: GradingConfig,
    pub toolchains: ToolchainConfig,
}

/// Grading session configuration
#[derive(Debug, Clone)]
pub struct GradingConfig {
    /// Wall-clock budget for one program execution
    pub time_budget: Duration,
    /// Wall-clock limit for one compiler invocation
    pub build_timeout: Duration,
    /// Directory holding the case pairs
    pub case_dir: PathBuf,
    /// Parent directory for per-session work dirs (system temp dir if unset)
    pub work_dir: Option<PathBuf>,
    /// Compute a line diff for wrong answers
    pub show_diff: bool,
}

/// Executables used for each language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    pub cc: String,
    pub cxx: String,
    pub javac: String,
    pub java: String,
    pub python: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            grading: GradingConfig::from_env()?,
            toolchains: ToolchainConfig::from_env()?,
        })
    }
}

impl GradingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let time_budget_ms: u64 = env::var("GRADER_TIME_BUDGET_MS")
            .unwrap_or_else(|_| DEFAULT_TIME_BUDGET_MS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("GRADER_TIME_BUDGET_MS".to_string()))?;
        if time_budget_ms == 0 {
            return Err(ConfigError::InvalidValue("GRADER_TIME_BUDGET_MS".to_string()));
        }

        let build_timeout_ms: u64 = env::var("GRADER_BUILD_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_BUILD_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("GRADER_BUILD_TIMEOUT_MS".to_string()))?;
        if build_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("GRADER_BUILD_TIMEOUT_MS".to_string()));
        }

        let show_diff = match env::var("GRADER_SHOW_DIFF") {
            Ok(value) => parse_bool(&value)
                .ok_or_else(|| ConfigError::InvalidValue("GRADER_SHOW_DIFF".to_string()))?,
            Err(_) => true,
        };

        Ok(Self {
            time_budget: Duration::from_millis(time_budget_ms),
            build_timeout: Duration::from_millis(build_timeout_ms),
            case_dir: PathBuf::from(
                env::var("GRADER_CASE_DIR").unwrap_or_else(|_| DEFAULT_CASE_DIR.to_string()),
            ),
            work_dir: env::var("GRADER_WORK_DIR").ok().map(PathBuf::from),
            show_diff,
        })
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
            build_timeout: Duration::from_millis(DEFAULT_BUILD_TIMEOUT_MS),
            case_dir: PathBuf::from(DEFAULT_CASE_DIR),
            work_dir: None,
            show_diff: true,
        }
    }
}

impl ToolchainConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cc: tool_var("GRADER_CC", toolchains::CC)?,
            cxx: tool_var("GRADER_CXX", toolchains::CXX)?,
            javac: tool_var("GRADER_JAVAC", toolchains::JAVAC)?,
            java: tool_var("GRADER_JAVA", toolchains::JAVA)?,
            python: tool_var("GRADER_PYTHON", toolchains::PYTHON)?,
        })
    }
}

/// Toolchain executable from the environment; set-but-blank counts as missing
fn tool_var(name: &str, default: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::Missing(name.to_string())),
        Ok(value) => Ok(value),
        Err(_) => Ok(default.to_string()),
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cc: toolchains::CC.to_string(),
            cxx: toolchains::CXX.to_string(),
            javac: toolchains::JAVAC.to_string(),
            java: toolchains::JAVA.to_string(),
            python: toolchains::PYTHON.to_string(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let grading = GradingConfig::default();
        assert_eq!(grading.time_budget, Duration::from_secs(5));
        assert_eq!(grading.build_timeout, Duration::from_secs(30));
        assert_eq!(grading.case_dir, PathBuf::from("testcase"));
        assert!(grading.work_dir.is_none());
        assert!(grading.show_diff);

        let tools = ToolchainConfig::default();
        assert_eq!(tools.cc, "gcc");
        assert_eq!(tools.cxx, "g++");
        assert_eq!(tools.python, "python3");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
