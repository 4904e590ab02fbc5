//! Test case model

use std::path::PathBuf;

use serde::Serialize;

/// One input/expected-output pair found in the case directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Numeric id parsed from `input<N>.txt`
    pub id: u64,
    pub input_path: PathBuf,
    pub expected_path: PathBuf,
}

impl TestCase {
    pub fn new(id: u64, input_path: impl Into<PathBuf>, expected_path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            input_path: input_path.into(),
            expected_path: expected_path.into(),
        }
    }
}
