//! Command-line interface: argument parsing, logging setup, run loop.

use crate::config::{DEFAULT_MAX_DEPTH, DEFAULT_THREADS, ScanConfig};
use crate::parallel;
use crate::reports;
use crate::rules::RuleSet;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "secretguard",
    version,
    about = "Scan a directory tree (or stdin) for credential-like patterns",
    long_about = "Secretguard walks a filesystem tree, checks every text line against a \
                  built-in catalogue of credential patterns (API keys, tokens, private \
                  keys, connection strings) and prints a ranked, deduplicated report \
                  suitable for CI gating."
)]
pub struct Cli {
    /// Root path to scan (defaults to the current directory)
    #[arg(value_name = "PATH", conflicts_with = "stdin")]
    pub path: Option<PathBuf>,

    /// Limit how deep the walker recurses; negative means unlimited
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH, allow_negative_numbers = true)]
    pub max_depth: i32,

    /// Number of worker threads; 0 picks one per available CPU
    #[arg(long, value_name = "N", default_value_t = DEFAULT_THREADS,
          value_parser = clap::value_parser!(i32).range(0..))]
    pub threads: i32,

    /// Read from standard input instead of walking a path
    #[arg(long)]
    pub stdin: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Write results to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the banner and non-error logs
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn into_config(self) -> ScanConfig {
        ScanConfig {
            root_path: self.path.unwrap_or_else(|| PathBuf::from(".")),
            max_depth: self.max_depth,
            threads: self.threads,
            stdin_mode: self.stdin,
            json_output: self.json,
            output_path: self.out,
        }
    }

    /// Parse-free entry point so tests can drive the full run loop.
    pub fn run(self) -> Result<ExitCode> {
        setup_logging(self.verbose, self.quiet);
        let quiet = self.quiet;
        let config = self.into_config();

        if !config.json_output && !quiet {
            print_banner(&config);
        }

        let rules =
            Arc::new(RuleSet::compile().context("failed to compile the rule catalogue")?);
        let ctx = parallel::run_scan(&config, rules)?;

        match &config.output_path {
            Some(path) => {
                let mut file = File::create(path)
                    .with_context(|| format!("failed to open output file {}", path.display()))?;
                write_report(&ctx, &config, &mut file, false)?;
            }
            None => {
                let stdout = io::stdout();
                let color = atty::is(atty::Stream::Stdout);
                write_report(&ctx, &config, &mut stdout.lock(), color)?;
            }
        }

        // Findings alone never fail the process; an incomplete scan does.
        if ctx.scan_failed {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn write_report<W: Write>(
    ctx: &crate::scan::ScanContext,
    config: &ScanConfig,
    out: &mut W,
    color: bool,
) -> Result<()> {
    if config.json_output {
        reports::write_json_report(ctx, out).context("failed to write JSON report")?;
    } else {
        reports::write_text_report(ctx, out, color).context("failed to write report")?;
    }
    Ok(())
}

fn print_banner(config: &ScanConfig) {
    let version = env!("CARGO_PKG_VERSION");
    if config.stdin_mode {
        println!("secretguard v{version}  \u{2022}  mode: STDIN");
        println!("Target:  STDIN");
    } else {
        let depth = if config.max_depth < 0 {
            "unlimited".to_string()
        } else {
            config.max_depth.to_string()
        };
        let threads = if config.threads <= 0 {
            "auto".to_string()
        } else {
            config.threads.to_string()
        };
        let target = if config.root_path == PathBuf::from(".") {
            "Current Directory".to_string()
        } else {
            config.root_path.display().to_string()
        };
        println!("secretguard v{version}  \u{2022}  mode: filesystem \u{2022}  depth: {depth}");
        println!("Threads: {threads}");
        println!("Target:  {target}");
    }
    if let Some(out) = &config.output_path {
        println!("Output:  {}", out.display());
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            return EnvFilter::new("error");
        }
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    });

    // Logs go to stderr so a report on stdout stays machine-parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
