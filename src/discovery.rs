//! Locating the host application's data folder

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::IntensityError;

/// Depth-first search below `start` for a directory named `sentinel`.
///
/// Unreadable directories are skipped; `start` itself counts when its name
/// matches. Symlinked directories are not followed.
pub fn find_data_root(start: &Path, sentinel: &str) -> Result<PathBuf, IntensityError> {
    if start.file_name().is_some_and(|n| n == sentinel) {
        return Ok(start.to_path_buf());
    }

    let mut stack = vec![start.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                continue;
            }
        };

        let mut children = Vec::new();
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_dir() {
                continue;
            }
            let path = entry.path();
            if entry.file_name() == sentinel {
                info!(path = %path.display(), "Found data root");
                return Ok(path);
            }
            children.push(path);
        }
        children.sort();
        stack.extend(children.into_iter().rev());
    }

    Err(IntensityError::NotFound(format!(
        "no '{}' folder below {}",
        sentinel,
        start.display()
    )))
}
