//! Error types for the scanning library.

use thiserror::Error;

/// Errors surfaced by the scanning library.
///
/// Per-file problems (unreadable files, binary content, mid-stream read
/// errors) are not errors at this level: the pipeline records them in the
/// scan context counters and keeps going. Only conditions that invalidate
/// the whole run end up here.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A rule in the built-in catalogue failed to compile. A partially
    /// working rule set would silently under-detect, so this aborts
    /// catalogue construction entirely.
    #[error("failed to compile rule {rule}: {source}")]
    RuleCompilation {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },

    /// The directory walk could not start or aborted (e.g. the root path
    /// does not exist). The orchestrator turns this into `scan_failed` on
    /// the merged context rather than discarding partial results.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}
