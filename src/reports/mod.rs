//! Report formatting over a merged scan context.

mod json;
mod text;

pub use json::write_json_report;
pub use text::write_text_report;

use crate::rules::Severity;
use crate::scan::ScanContext;

/// Overall verdict of a scan, for CI gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Ok,
    Warn,
    Error,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Ok => "OK",
            ReportStatus::Warn => "WARN",
            ReportStatus::Error => "ERROR",
        }
    }
}

/// Derive the report status: a failed scan or any High finding is an
/// error, a Medium finding a warning, anything else is clean.
pub fn report_status(ctx: &ScanContext) -> ReportStatus {
    if ctx.scan_failed || ctx.highest_severity() == Severity::High {
        ReportStatus::Error
    } else if ctx.highest_severity() == Severity::Medium {
        ReportStatus::Warn
    } else {
        ReportStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_is_ok() {
        let ctx = ScanContext::new();
        assert_eq!(report_status(&ctx), ReportStatus::Ok);
    }

    #[test]
    fn medium_findings_warn() {
        let mut ctx = ScanContext::new();
        ctx.record("R", Severity::Medium, "f", 1, 1);
        assert_eq!(report_status(&ctx), ReportStatus::Warn);
    }

    #[test]
    fn high_findings_error() {
        let mut ctx = ScanContext::new();
        ctx.record("R", Severity::High, "f", 1, 1);
        assert_eq!(report_status(&ctx), ReportStatus::Error);
    }

    #[test]
    fn low_findings_stay_ok() {
        let mut ctx = ScanContext::new();
        ctx.record("R", Severity::Low, "f", 1, 1);
        assert_eq!(report_status(&ctx), ReportStatus::Ok);
    }

    #[test]
    fn scan_failure_forces_error_even_without_findings() {
        let mut ctx = ScanContext::new();
        ctx.scan_failed = true;
        assert_eq!(report_status(&ctx), ReportStatus::Error);
    }
}
