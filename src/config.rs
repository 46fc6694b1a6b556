//! Resolved scan configuration.
//!
//! One flat struct, built by the CLI layer and passed explicitly to the
//! orchestrator; nothing in the core reads configuration from globals.

use std::path::PathBuf;

pub const DEFAULT_MAX_DEPTH: i32 = -1;
pub const DEFAULT_THREADS: i32 = 0;

/// Everything one scan invocation needs to know.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root of the filesystem walk. Ignored in stdin mode.
    pub root_path: PathBuf,
    /// Directory recursion limit; negative means unlimited, 0 means only
    /// files directly under the root.
    pub max_depth: i32,
    /// Worker thread count; 0 or less means one per available CPU.
    pub threads: i32,
    /// Scan standard input instead of walking the filesystem.
    pub stdin_mode: bool,
    /// Emit the JSON report instead of the text report.
    pub json_output: bool,
    /// Report destination; `None` writes to stdout.
    pub output_path: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            root_path: PathBuf::from("."),
            max_depth: DEFAULT_MAX_DEPTH,
            threads: DEFAULT_THREADS,
            stdin_mode: false,
            json_output: false,
            output_path: None,
        }
    }
}
