//! Submitted program model

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{GradeError, GradeResult};

/// The program being graded. One per session, never mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUnit {
    path: PathBuf,
    extension: String,
    stem: String,
}

impl SourceUnit {
    /// Derive a source unit from a path without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> GradeResult<Self> {
        let path = path.into();

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                GradeError::Internal(anyhow::anyhow!(
                    "Source path has no usable file name: {}",
                    path.display()
                ))
            })?
            .to_string();

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            path,
            extension,
            stem,
        })
    }

    /// Load a source unit, checking that the file exists
    pub fn load(path: impl AsRef<Path>) -> GradeResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(GradeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Source file not found: {}", path.display()),
            )));
        }

        Self::new(std::path::absolute(path)?)
    }

    /// Path to the source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file extension (without the dot); empty if none
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Logical program name, used to name build artifacts
    pub fn stem(&self) -> &str {
        &self.stem
    }
}
