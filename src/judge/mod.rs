//! Test execution and verdict engine
//!
//! Each case runs build, execution, comparison and reclaim in order. The
//! [`Grader`] owns the session and drives the steps.

pub mod build;
pub mod comparator;
pub mod diff;
pub mod discovery;
pub mod executor;
pub mod reclaimer;
pub mod runner;

pub use comparator::{compare_text, normalize, Comparison};
pub use diff::{line_diff, DiffKind, DiffLine};
pub use discovery::discover_cases;
pub use reclaimer::{CaseArtifacts, ReclaimStats};
pub use runner::{CaseStage, Grader};
