//! # Secretguard
//!
//! A concurrent secret scanner: walks a filesystem tree (or reads
//! standard input), checks every line against a fixed catalogue of
//! credential patterns and produces a ranked, deterministic report for
//! CI gating.
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use secretguard::config::ScanConfig;
//! use secretguard::parallel::run_scan;
//! use secretguard::rules::RuleSet;
//! use std::sync::Arc;
//!
//! let rules = Arc::new(RuleSet::compile()?);
//! let config = ScanConfig {
//!     root_path: "src/".into(),
//!     ..ScanConfig::default()
//! };
//! let result = run_scan(&config, rules)?;
//! for finding in result.findings() {
//!     println!("{} {}:{}:{}", finding.rule, finding.path, finding.line, finding.column);
//! }
//! # Ok::<(), secretguard::error::ScanError>(())
//! ```
//!
//! Findings are ordered by severity (descending), then path, line,
//! column and rule name; the order is identical whether the scan ran on
//! one thread or many.

pub mod cli;
pub mod config;
pub mod error;
pub mod parallel;
pub mod reports;
pub mod rules;
pub mod scan;
pub mod walk;

pub use config::ScanConfig;
pub use error::ScanError;
pub use rules::{RuleSet, Severity};
pub use scan::{Finding, ScanContext};
