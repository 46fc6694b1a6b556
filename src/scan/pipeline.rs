//! Line-oriented stream scanning.
//!
//! Streams are read in fixed-size chunks and reassembled into logical
//! lines, so a secret split across a chunk boundary is still seen whole.
//! Binary content is detected from the first chunk only and skipped.

use crate::rules::RuleSet;
use crate::scan::context::ScanContext;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Label used in findings when scanning standard input.
pub const STDIN_LABEL: &str = "stdin";

/// Internal read chunk size. Not user-tunable.
const CHUNK_SIZE: usize = 8192;

/// A stream whose first chunk has more than this fraction of control
/// bytes is treated as binary.
const BINARY_CONTROL_FRACTION: f64 = 0.30;

/// Classification of one scanned stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The stream was read to the end; findings (possibly none) recorded.
    Scanned,
    /// Binary content; nothing was scanned, not an error.
    Skipped,
    /// The stream could not be opened or died mid-read.
    Failed,
}

/// Scan one file path into `ctx`.
///
/// An unopenable path is counted as a skip and never poisons a multi-file
/// scan; the caller just moves on to the next path.
pub fn scan_path(rules: &RuleSet, ctx: &mut ScanContext, path: &Path) -> ScanOutcome {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot open file");
            ctx.files_skipped += 1;
            return ScanOutcome::Failed;
        }
    };
    scan_stream(rules, ctx, &path.to_string_lossy(), file)
}

/// Scan standard input into `ctx` under the [`STDIN_LABEL`] sentinel.
pub fn scan_stdin(rules: &RuleSet, ctx: &mut ScanContext) -> ScanOutcome {
    scan_stream(rules, ctx, STDIN_LABEL, io::stdin().lock())
}

/// Scan an arbitrary byte source into `ctx`.
///
/// Lines are split on `\n` with a trailing `\r` stripped; a final line
/// with no newline is still scanned. Line numbers are 1-based, columns
/// are 1-based byte offsets of the match start.
pub fn scan_stream<R: Read>(
    rules: &RuleSet,
    ctx: &mut ScanContext,
    label: &str,
    mut source: R,
) -> ScanOutcome {
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut pending: Vec<u8> = Vec::with_capacity(CHUNK_SIZE);
    let mut line_number: u64 = 0;
    let mut first_chunk = true;

    loop {
        let read = match source.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                warn!(source = label, error = %err, "read error, aborting stream");
                ctx.files_skipped += 1;
                ctx.scan_failed = true;
                return ScanOutcome::Failed;
            }
        };

        if first_chunk {
            first_chunk = false;
            if looks_binary(&chunk[..read]) {
                debug!(source = label, "binary content, skipping");
                ctx.files_skipped += 1;
                return ScanOutcome::Skipped;
            }
        }

        pending.extend_from_slice(&chunk[..read]);

        let mut consumed = 0;
        while let Some(offset) = pending[consumed..].iter().position(|&b| b == b'\n') {
            let end = consumed + offset;
            line_number += 1;
            scan_line_into(rules, ctx, label, line_number, strip_cr(&pending[consumed..end]));
            consumed = end + 1;
        }
        pending.drain(..consumed);
    }

    if !pending.is_empty() {
        line_number += 1;
        scan_line_into(rules, ctx, label, line_number, strip_cr(&pending));
    }

    ctx.files_scanned += 1;
    ScanOutcome::Scanned
}

fn scan_line_into(
    rules: &RuleSet,
    ctx: &mut ScanContext,
    label: &str,
    line_number: u64,
    line: &[u8],
) {
    for found in rules.scan_line(line) {
        ctx.record(
            found.rule,
            found.severity,
            label,
            line_number,
            found.start as u64 + 1,
        );
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// First-chunk binary heuristic: any NUL byte means binary; otherwise a
/// high share of control bytes does. Later chunks are never inspected, so
/// a file that starts as text and turns binary is scanned as text; the
/// skip counts are defined in terms of the first chunk only.
fn looks_binary(chunk: &[u8]) -> bool {
    if chunk.is_empty() {
        return false;
    }
    let mut control = 0usize;
    for &byte in chunk {
        if byte == 0x00 {
            return true;
        }
        if matches!(byte, 0x01..=0x08 | 0x0E..=0x1F) {
            control += 1;
        }
    }
    control as f64 / chunk.len() as f64 > BINARY_CONTROL_FRACTION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Severity;
    use std::io::Cursor;

    fn rules() -> RuleSet {
        RuleSet::compile().unwrap()
    }

    /// Reader that yields one good chunk, then an I/O error.
    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::Other, "boom"));
            }
            self.served = true;
            let data = b"password = hunter2\n";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn single_line_secret_has_line_one_column_one() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        let outcome = scan_stream(&rules, &mut ctx, "t", Cursor::new("password = hunter2\n"));
        assert_eq!(outcome, ScanOutcome::Scanned);
        assert_eq!(ctx.finding_count(), 1);
        let finding = &ctx.findings()[0];
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.line, 1);
        assert_eq!(finding.column, 1);
        assert_eq!(finding.path, "t");
        assert_eq!(ctx.files_scanned, 1);
        assert_eq!(ctx.files_skipped, 0);
    }

    #[test]
    fn final_line_without_newline_is_scanned() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        scan_stream(&rules, &mut ctx, "t", Cursor::new("nothing here\npassword = hunter2"));
        assert_eq!(ctx.finding_count(), 1);
        assert_eq!(ctx.findings()[0].line, 2);
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        scan_stream(&rules, &mut ctx, "t", Cursor::new("password = hunter2\r\nplain\r\n"));
        assert_eq!(ctx.finding_count(), 1);
        assert_eq!(ctx.findings()[0].line, 1);
    }

    #[test]
    fn line_numbers_count_every_newline() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        let input = "one\n\nthree\npassword = a\n\npassword = b\n";
        scan_stream(&rules, &mut ctx, "t", Cursor::new(input));
        let lines: Vec<_> = ctx.findings().iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![4, 6]);
    }

    #[test]
    fn line_spanning_chunk_boundary_is_reassembled() {
        // Pad so the secret straddles the internal chunk size.
        let mut input = " ".repeat(CHUNK_SIZE - 4);
        input.push_str("password = hunter2\n");
        let rules = rules();
        let mut ctx = ScanContext::new();
        scan_stream(&rules, &mut ctx, "t", Cursor::new(input));
        assert_eq!(ctx.finding_count(), 1);
        let finding = &ctx.findings()[0];
        assert_eq!(finding.line, 1);
        assert_eq!(finding.column, (CHUNK_SIZE - 4) as u64 + 1);
    }

    #[test]
    fn empty_stream_counts_as_scanned() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        let outcome = scan_stream(&rules, &mut ctx, "t", Cursor::new(""));
        assert_eq!(outcome, ScanOutcome::Scanned);
        assert_eq!(ctx.finding_count(), 0);
        assert_eq!(ctx.files_scanned, 1);
        assert_eq!(ctx.files_skipped, 0);
    }

    #[test]
    fn nul_byte_means_binary_even_amid_text() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        let outcome = scan_stream(
            &rules,
            &mut ctx,
            "t",
            Cursor::new(b"password = hunter2\x00more".to_vec()),
        );
        assert_eq!(outcome, ScanOutcome::Skipped);
        assert_eq!(ctx.finding_count(), 0);
        assert_eq!(ctx.files_scanned, 0);
        assert_eq!(ctx.files_skipped, 1);
        assert!(!ctx.scan_failed);
    }

    #[test]
    fn control_byte_fraction_over_threshold_is_binary() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        // 4 of 10 bytes are control characters: 40% > 30%.
        let data = b"\x01\x01\x01\x01aaaaaa".to_vec();
        let outcome = scan_stream(&rules, &mut ctx, "t", Cursor::new(data));
        assert_eq!(outcome, ScanOutcome::Skipped);
        assert_eq!(ctx.files_skipped, 1);
    }

    #[test]
    fn control_byte_fraction_at_threshold_is_text() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        // Exactly 30% control bytes: not binary (threshold is strict).
        let data = b"\x01\x01\x01aaaaaaa".to_vec();
        let outcome = scan_stream(&rules, &mut ctx, "t", Cursor::new(data));
        assert_eq!(outcome, ScanOutcome::Scanned);
        assert_eq!(ctx.files_scanned, 1);
    }

    #[test]
    fn tabs_and_newlines_do_not_count_as_control() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        let data = "\t\t\t\t\t\npassword = hunter2\n";
        let outcome = scan_stream(&rules, &mut ctx, "t", Cursor::new(data));
        assert_eq!(outcome, ScanOutcome::Scanned);
        assert_eq!(ctx.finding_count(), 1);
    }

    #[test]
    fn missing_path_is_failed_and_counted_skipped() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        let outcome = scan_path(&rules, &mut ctx, Path::new("/nonexistent/really/not/here"));
        assert_eq!(outcome, ScanOutcome::Failed);
        assert_eq!(ctx.finding_count(), 0);
        assert_eq!(ctx.files_scanned, 0);
        assert_eq!(ctx.files_skipped, 1);
        // Open failures never mark the whole scan as failed.
        assert!(!ctx.scan_failed);
    }

    #[test]
    fn mid_stream_read_error_fails_and_keeps_prior_findings() {
        let rules = rules();
        let mut ctx = ScanContext::new();
        let outcome = scan_stream(&rules, &mut ctx, "t", FailingReader { served: false });
        assert_eq!(outcome, ScanOutcome::Failed);
        assert!(ctx.scan_failed);
        assert_eq!(ctx.files_skipped, 1);
        assert_eq!(ctx.files_scanned, 0);
        // The line delivered before the error was already recorded.
        assert_eq!(ctx.finding_count(), 1);
    }

    #[test]
    fn scan_path_reads_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.txt");
        std::fs::write(&path, "api_key = ABCD\n").unwrap();
        let rules = rules();
        let mut ctx = ScanContext::new();
        let outcome = scan_path(&rules, &mut ctx, &path);
        assert_eq!(outcome, ScanOutcome::Scanned);
        assert_eq!(ctx.files_scanned, 1);
        assert!(ctx.finding_count() >= 1);
        assert_eq!(ctx.highest_severity(), Severity::Medium);
    }
}
