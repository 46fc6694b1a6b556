//! Per-scan accumulator: ordered findings, counters, severity tracking.

use crate::rules::Severity;
use std::cmp::Ordering;

/// A single reported match between a rule and a location.
///
/// Immutable once created; owned by exactly one [`ScanContext`] until a
/// merge transfers it to the destination context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub rule: &'static str,
    pub severity: Severity,
    /// File path, or the stdin sentinel label.
    pub path: String,
    /// 1-based line number.
    pub line: u64,
    /// 1-based byte offset of the match start within the line.
    pub column: u64,
}

impl Ord for Finding {
    /// Report order: severity descending, then path, line number, column
    /// and rule name ascending. A strict total order, so the final report
    /// is identical no matter how findings were distributed across
    /// workers or in which order they were recorded.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .severity
            .cmp(&self.severity)
            .then_with(|| self.path.cmp(&other.path))
            .then_with(|| self.line.cmp(&other.line))
            .then_with(|| self.column.cmp(&other.column))
            .then_with(|| self.rule.cmp(other.rule))
    }
}

impl PartialOrd for Finding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Mutable accumulator for one scanning unit.
///
/// One instance exists per worker during parallel execution, plus the
/// top-level instance that receives the merged result. No two threads
/// ever touch the same context.
#[derive(Debug, Default)]
pub struct ScanContext {
    findings: Vec<Finding>,
    pub files_scanned: u64,
    pub files_skipped: u64,
    pub scan_failed: bool,
    highest_severity: Severity,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finding, keeping the collection sorted.
    ///
    /// Insertion cost is linear in the current size; match volume per scan
    /// is small relative to file volume, so a sorted vector beats a tree
    /// here.
    pub fn record(
        &mut self,
        rule: &'static str,
        severity: Severity,
        path: &str,
        line: u64,
        column: u64,
    ) {
        let finding = Finding {
            rule,
            severity,
            path: path.to_owned(),
            line,
            column,
        };
        let at = self
            .findings
            .binary_search(&finding)
            .unwrap_or_else(|insert_at| insert_at);
        self.findings.insert(at, finding);
        if severity > self.highest_severity {
            self.highest_severity = severity;
        }
    }

    /// Fold another context into this one.
    ///
    /// Findings are re-inserted under the same sort invariant; counters
    /// are summed, `scan_failed` is OR-ed and `highest_severity` takes the
    /// maximum. Associative and commutative with respect to the final
    /// sorted order, so the merge order of workers never shows in the
    /// report.
    pub fn merge(&mut self, other: ScanContext) {
        for finding in other.findings {
            let at = self
                .findings
                .binary_search(&finding)
                .unwrap_or_else(|insert_at| insert_at);
            self.findings.insert(at, finding);
        }
        self.files_scanned += other.files_scanned;
        self.files_skipped += other.files_skipped;
        self.scan_failed |= other.scan_failed;
        if other.highest_severity > self.highest_severity {
            self.highest_severity = other.highest_severity;
        }
    }

    /// Clear all findings and counters back to a fresh state.
    pub fn reset(&mut self) {
        self.findings.clear();
        self.files_scanned = 0;
        self.files_skipped = 0;
        self.scan_failed = false;
        self.highest_severity = Severity::default();
    }

    /// Findings in report order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn finding_count(&self) -> u64 {
        self.findings.len() as u64
    }

    /// Maximum severity among recorded findings; `Low` when empty.
    pub fn highest_severity(&self) -> Severity {
        self.highest_severity
    }
}
