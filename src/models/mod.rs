//! Domain models
//!
//! This module contains the data passed between grading stages.

pub mod case_result;
pub mod source_unit;
pub mod test_case;

pub use case_result::*;
pub use source_unit::*;
pub use test_case::*;
