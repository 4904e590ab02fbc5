//! Application-wide constants
//!
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// EXECUTION DEFAULTS
// =============================================================================

/// Default wall-clock budget for one program execution, in milliseconds
pub const DEFAULT_TIME_BUDGET_MS: u64 = 5_000;

/// Default wall-clock limit for one compiler invocation, in milliseconds
pub const DEFAULT_BUILD_TIMEOUT_MS: u64 = 30_000;

/// Default directory holding `input<N>.txt` / `output<N>.txt` pairs
pub const DEFAULT_CASE_DIR: &str = "testcase";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Prefix for per-session work directories
pub const WORK_DIR_PREFIX: &str = "casejudge-";

// =============================================================================
// CASE FILE NAMING
// =============================================================================

/// Case file naming conventions
pub mod case_files {
    /// Input file pattern; the capture group is the case id
    pub const INPUT_PATTERN: &str = r"^input(\d+)\.txt$";

    /// Expected output file prefix (`output<N>.txt`)
    pub const EXPECTED_PREFIX: &str = "output";

    /// Actual output file prefix, written inside the session work dir
    pub const ACTUAL_PREFIX: &str = "actual";

    /// Extension shared by all case files
    pub const EXTENSION: &str = "txt";
}

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers
pub mod languages {
    pub const C: &str = "c";
    pub const CPP: &str = "cpp";
    pub const JAVA: &str = "java";
    pub const PYTHON: &str = "python";
}

/// File extensions for each language
pub mod file_extensions {
    pub const C: &[&str] = &["c"];
    pub const CPP: &[&str] = &["cpp", "cc", "cxx"];
    pub const JAVA: &[&str] = &["java"];
    pub const PYTHON: &[&str] = &["py"];
}

/// Default toolchain executables
pub mod toolchains {
    pub const CC: &str = "gcc";
    pub const CXX: &str = "g++";
    pub const JAVAC: &str = "javac";
    pub const JAVA: &str = "java";
    pub const PYTHON: &str = "python3";
}

/// Suffixes of generated artifacts
pub mod artifacts {
    /// Native binaries built from C/C++ sources
    pub const BINARY_EXTENSION: &str = "out";

    /// JVM class files
    pub const CLASS_EXTENSION: &str = "class";
}
