//! Depth-bounded directory traversal.
//!
//! The walker only discovers regular files and hands them to a visitor;
//! what happens to a discovered path (inline scan or queue submission) is
//! the orchestrator's business.

use crate::error::ScanError;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

/// Walk `root` and invoke `visit` once per regular file.
///
/// `max_depth` counts directory levels below the root: 0 visits only
/// files directly under `root`, negative means unlimited. Symbolic links
/// are never followed or reported. An unreadable root aborts the walk;
/// unreadable entries deeper down are logged and skipped. A visitor error
/// stops the walk early.
pub fn walk<F>(root: &Path, max_depth: i32, visit: &mut F) -> Result<(), ScanError>
where
    F: FnMut(&Path) -> Result<(), ScanError>,
{
    let mut walker = WalkDir::new(root).follow_links(false);
    if max_depth >= 0 {
        // Our depth 0 = "files directly under root"; walkdir counts the
        // root itself as depth 0 and its children as depth 1.
        walker = walker.max_depth(max_depth as usize + 1);
    }

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(ScanError::Walk(err));
                }
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() {
            visit(entry.path())?;
        }
    }
    Ok(())
}
