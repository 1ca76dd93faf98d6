//! Workload path resolution.
//!
//! `/{workload}[/{rest...}]` → (`workload`, `rest`). Empty segments are
//! dropped, so `//foo//bar/` resolves the same as `/foo/bar`.

use thiserror::Error;

/// The request path carried no workload segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid request path")]
pub struct InvalidPath;

/// A request path split into its workload name and the remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadPath {
    /// First non-empty segment.
    pub workload: String,
    /// Remaining non-empty segments joined by `/`, without a leading slash.
    pub remaining: String,
}

/// Split `path` into workload name and remaining path.
pub fn resolve(path: &str) -> Result<WorkloadPath, InvalidPath> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let workload = segments.next().ok_or(InvalidPath)?;
    let remaining = segments.collect::<Vec<_>>().join("/");

    Ok(WorkloadPath {
        workload: workload.to_string(),
        remaining,
    })
}
