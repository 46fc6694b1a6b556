//! Human-readable report.

use super::{ReportStatus, report_status};
use crate::rules::Severity;
use crate::scan::ScanContext;
use std::io::{self, Write};

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::High => RED,
        Severity::Medium => YELLOW,
        Severity::Low => GREEN,
    }
}

fn status_color(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Error => RED,
        ReportStatus::Warn => YELLOW,
        ReportStatus::Ok => GREEN,
    }
}

/// Write the text report. `use_color` should only be set when the sink is
/// a terminal; a report written to a file or pipe carries no escape
/// sequences.
pub fn write_text_report<W: Write>(
    ctx: &ScanContext,
    out: &mut W,
    use_color: bool,
) -> io::Result<()> {
    let status = report_status(ctx);
    writeln!(
        out,
        "Summary: {} findings={} files_scanned={} files_skipped={}",
        paint(status.as_str(), status_color(status), use_color),
        ctx.finding_count(),
        ctx.files_scanned,
        ctx.files_skipped,
    )?;
    if ctx.scan_failed {
        writeln!(out, "Warning: scan incomplete, some paths could not be read")?;
    }

    writeln!(out, "Results:")?;
    if ctx.findings().is_empty() {
        writeln!(out, "  (no findings)")?;
        return Ok(());
    }
    for finding in ctx.findings() {
        let tag = format!("[{}]", finding.severity);
        writeln!(
            out,
            "  {} {} {}:{}:{}",
            paint(&tag, severity_color(finding.severity), use_color),
            finding.rule,
            finding.path,
            finding.line,
            finding.column,
        )?;
    }
    Ok(())
}
