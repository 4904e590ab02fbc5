//! Artifact reclaimer
//!
//! Removes the per-case output file and build artifact once a case has an
//! outcome. Cleanup is best-effort: failures are logged and counted, never
//! turned into case failures.

use std::io;
use std::path::{Path, PathBuf};

use crate::toolchain::ExecutionArtifact;

/// Statistics from one reclaim pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReclaimStats {
    pub files_deleted: u64,
    pub bytes_freed: u64,
    pub errors: u64,
}

/// Files one case may leave on disk.
///
/// [`CaseArtifacts::reclaim`] removes them explicitly; dropping the handle
/// without reclaiming removes them too, so an early return or panic cannot
/// leave a stale artifact for the next case.
#[derive(Debug)]
pub struct CaseArtifacts {
    output_path: PathBuf,
    artifact: Option<ExecutionArtifact>,
    reclaimed: bool,
}

impl CaseArtifacts {
    pub fn new(output_path: PathBuf, artifact: Option<ExecutionArtifact>) -> Self {
        Self {
            output_path,
            artifact,
            reclaimed: false,
        }
    }

    /// Where the execution step writes stdout
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Delete everything this case produced
    pub fn reclaim(mut self) -> ReclaimStats {
        self.reclaimed = true;
        reclaim(&self.output_path, self.artifact.as_ref())
    }
}

impl Drop for CaseArtifacts {
    fn drop(&mut self) {
        if !self.reclaimed {
            let stats = reclaim(&self.output_path, self.artifact.as_ref());
            tracing::debug!(
                files_deleted = stats.files_deleted,
                errors = stats.errors,
                "Reclaimed case artifacts on drop"
            );
        }
    }
}

/// Delete the actual-output file and the artifact's files, if present
pub fn reclaim(output_path: &Path, artifact: Option<&ExecutionArtifact>) -> ReclaimStats {
    let mut stats = ReclaimStats::default();

    let mut paths = vec![output_path.to_path_buf()];
    if let Some(artifact) = artifact {
        paths.extend(artifact.existing_paths());
    }

    for path in paths {
        match delete_file(&path) {
            Ok(Some(bytes)) => {
                stats.files_deleted += 1;
                stats.bytes_freed += bytes;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to delete {:?}: {}", path, e);
                stats.errors += 1;
            }
        }
    }

    stats
}

/// Delete a file and return bytes freed; `None` if it was already gone
fn delete_file(path: &Path) -> io::Result<Option<u64>> {
    let bytes = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    match std::fs::remove_file(path) {
        Ok(()) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
