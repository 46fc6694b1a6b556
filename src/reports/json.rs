//! Machine-readable report.
//!
//! The shape is part of the CI contract: a `summary` object first, then
//! the `findings` array in report order. Struct field order below is the
//! JSON key order.

use super::report_status;
use crate::scan::ScanContext;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: JsonSummary,
    findings: Vec<JsonFinding<'a>>,
}

#[derive(Serialize)]
struct JsonSummary {
    status: &'static str,
    findings: u64,
    files_scanned: u64,
    files_skipped: u64,
    scan_failed: bool,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    severity: &'static str,
    rule: &'static str,
    file: &'a str,
    line: u64,
    col: u64,
}

/// Write the compact JSON report followed by a newline.
pub fn write_json_report<W: Write>(ctx: &ScanContext, out: &mut W) -> anyhow::Result<()> {
    let report = JsonReport {
        summary: JsonSummary {
            status: report_status(ctx).as_str(),
            findings: ctx.finding_count(),
            files_scanned: ctx.files_scanned,
            files_skipped: ctx.files_skipped,
            scan_failed: ctx.scan_failed,
        },
        findings: ctx
            .findings()
            .iter()
            .map(|finding| JsonFinding {
                severity: finding.severity.as_str(),
                rule: finding.rule,
                file: &finding.path,
                line: finding.line,
                col: finding.column,
            })
            .collect(),
    };
    serde_json::to_writer(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Severity;
    use serde_json::Value;

    fn render(ctx: &ScanContext) -> String {
        let mut buf = Vec::new();
        write_json_report(ctx, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_scan_serializes_ok_summary() {
        let ctx = ScanContext::new();
        let out = render(&ctx);
        assert!(out.contains("\"status\":\"OK\""));
        assert!(out.contains("\"findings\":0"));

        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["summary"]["files_scanned"], 0);
        assert_eq!(value["summary"]["scan_failed"], false);
        assert_eq!(value["findings"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn summary_precedes_findings_in_the_byte_stream() {
        let ctx = ScanContext::new();
        let out = render(&ctx);
        let summary_at = out.find("\"summary\"").unwrap();
        let findings_at = out.find("\"findings\":[").unwrap();
        assert!(summary_at < findings_at);
    }

    #[test]
    fn findings_carry_all_location_fields_in_report_order() {
        let mut ctx = ScanContext::new();
        ctx.record("GENERIC_APIKEY_KV", Severity::Medium, "b.txt", 4, 2);
        ctx.record("GENERIC_PASSWORD_KV", Severity::High, "a.txt", 7, 3);
        ctx.files_scanned = 2;

        let value: Value = serde_json::from_str(&render(&ctx)).unwrap();
        let findings = value["findings"].as_array().unwrap();
        assert_eq!(findings.len(), 2);
        // High severity sorts first.
        assert_eq!(findings[0]["severity"], "HIGH");
        assert_eq!(findings[0]["rule"], "GENERIC_PASSWORD_KV");
        assert_eq!(findings[0]["file"], "a.txt");
        assert_eq!(findings[0]["line"], 7);
        assert_eq!(findings[0]["col"], 3);
        assert_eq!(findings[1]["severity"], "MEDIUM");
        assert_eq!(value["summary"]["status"], "ERROR");
    }

    #[test]
    fn failed_scan_is_error_status_with_flag_set() {
        let mut ctx = ScanContext::new();
        ctx.scan_failed = true;
        ctx.files_skipped = 1;
        let value: Value = serde_json::from_str(&render(&ctx)).unwrap();
        assert_eq!(value["summary"]["status"], "ERROR");
        assert_eq!(value["summary"]["scan_failed"], true);
        assert_eq!(value["summary"]["files_skipped"], 1);
    }
}
