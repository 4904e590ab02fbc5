//! casejudge - Multi-language Program Grader
//!
//! Compiles a submitted source file when its language needs it, runs it
//! against a directory of `input<N>.txt` / `output<N>.txt` pairs, and reports
//! a verdict per case plus an aggregate score.
//!
//! # Features
//!
//! - C, C++, Java and Python toolchains
//! - Per-execution wall-clock budget with process-group termination
//! - Whitespace-tolerant comparison with a line diff for wrong answers
//! - Per-session work directory; artifacts are reclaimed after every case
//!
//! # Architecture
//!
//! - **Toolchain**: maps a source extension to compile and run invocations
//! - **Judge**: build, execute, compare and reclaim steps, driven by the
//!   [`Grader`]
//! - **Models**: source unit, cases, results and the session report
//! - **Report**: text rendering of a session

pub mod config;
pub mod constants;
pub mod error;
pub mod judge;
pub mod models;
pub mod report;
pub mod toolchain;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, GradingConfig, ToolchainConfig};
pub use error::{GradeError, GradeResult};
pub use judge::{discover_cases, Grader};
pub use models::{CaseFailure, CaseResult, CaseStatus, SessionReport, SessionScore, SourceUnit, TestCase};
pub use toolchain::{Language, ToolchainPlan};
