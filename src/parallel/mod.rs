//! Scan orchestration: serial vs. parallel execution and result merging.

mod pool;

pub use pool::ThreadPool;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::rules::RuleSet;
use crate::scan::{self, ScanContext};
use crate::walk;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Slots in the pool's job queue. Submission blocks when all are taken,
/// throttling the walker to the workers' pace.
const QUEUE_CAPACITY: usize = 256;

/// Turn the configured thread count into an effective worker count.
pub fn resolve_thread_count(requested: i32) -> usize {
    if requested <= 0 {
        num_cpus::get().max(1)
    } else {
        requested as usize
    }
}

/// Run one complete scan and return the merged context.
///
/// Stdin mode reads a single stream directly. Otherwise the directory
/// walker feeds file paths either to an inline scan (one effective
/// worker) or to a bounded-queue thread pool with one private context per
/// worker; worker contexts are merged in index order afterwards, so the
/// report never depends on scheduling.
///
/// A walker failure sets `scan_failed` on the result but keeps whatever
/// findings were collected before it: partial results are always
/// surfaced.
pub fn run_scan(config: &ScanConfig, rules: Arc<RuleSet>) -> Result<ScanContext, ScanError> {
    let mut merged = ScanContext::new();

    if config.stdin_mode {
        scan::scan_stdin(&rules, &mut merged);
        return Ok(merged);
    }

    let threads = resolve_thread_count(config.threads);
    debug!(threads, root = %config.root_path.display(), "starting scan");

    if threads <= 1 {
        let walked = walk::walk(&config.root_path, config.max_depth, &mut |path| {
            scan::scan_path(&rules, &mut merged, path);
            Ok(())
        });
        if let Err(err) = walked {
            warn!(error = %err, "walk failed, reporting partial results");
            merged.scan_failed = true;
        }
        return Ok(merged);
    }

    let contexts: Vec<ScanContext> = (0..threads).map(|_| ScanContext::new()).collect();
    let worker_rules = Arc::clone(&rules);
    let pool = ThreadPool::new(QUEUE_CAPACITY, contexts, move |ctx: &mut ScanContext, path: PathBuf| {
        scan::scan_path(&worker_rules, ctx, &path);
    });

    let walked = walk::walk(&config.root_path, config.max_depth, &mut |path| {
        // Each job owns its path; blocks here are the back-pressure.
        pool.submit(path.to_path_buf());
        Ok(())
    });

    pool.wait_idle();
    for ctx in pool.stop_and_join() {
        merged.merge(ctx);
    }

    if let Err(err) = walked {
        warn!(error = %err, "walk failed, reporting partial results");
        merged.scan_failed = true;
    }
    Ok(merged)
}
