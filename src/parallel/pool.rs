//! Bounded-queue thread pool.
//!
//! A fixed set of worker threads consumes jobs from a bounded crossbeam
//! channel. `submit` blocks while the queue is full, which is the
//! back-pressure that keeps a fast producer from buffering unbounded
//! work. Waiting for the queue to drain (`wait_idle`) and shutting the
//! pool down (`stop_and_join`) are deliberately separate operations.

use crossbeam::channel::{Receiver, Sender, bounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

struct PoolShared {
    pending: Mutex<usize>,
    idle: Condvar,
    shutdown: AtomicBool,
}

impl PoolShared {
    fn job_done(&self) {
        let mut pending = self.pending.lock().expect("pool lock poisoned");
        *pending -= 1;
        if *pending == 0 {
            self.idle.notify_all();
        }
    }
}

/// Fixed-size worker pool over a bounded job queue.
///
/// Each worker owns a private state value of type `S` (handed over at
/// construction and returned by [`stop_and_join`](Self::stop_and_join) in
/// worker-index order), so the job handler never needs shared mutable
/// state. Jobs are dropped after processing; a job type with a `Drop`
/// impl gets its cleanup exactly once either way.
pub struct ThreadPool<J, S> {
    job_tx: Option<Sender<J>>,
    workers: Vec<JoinHandle<S>>,
    shared: Arc<PoolShared>,
}

impl<J, S> ThreadPool<J, S>
where
    J: Send + 'static,
    S: Send + 'static,
{
    /// Start `states.len()` workers over a queue of `queue_capacity`
    /// slots. The handler runs on worker threads with that worker's own
    /// state.
    pub fn new<F>(queue_capacity: usize, states: Vec<S>, handler: F) -> Self
    where
        F: Fn(&mut S, J) + Send + Sync + 'static,
    {
        assert!(!states.is_empty(), "pool needs at least one worker");
        assert!(queue_capacity > 0, "pool queue needs at least one slot");

        let (job_tx, job_rx): (Sender<J>, Receiver<J>) = bounded(queue_capacity);
        let shared = Arc::new(PoolShared {
            pending: Mutex::new(0),
            idle: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });
        let handler = Arc::new(handler);

        let workers = states
            .into_iter()
            .map(|mut state| {
                let job_rx = job_rx.clone();
                let shared = Arc::clone(&shared);
                let handler = Arc::clone(&handler);
                thread::spawn(move || {
                    while let Ok(job) = job_rx.recv() {
                        // A job drained after shutdown is released, not run.
                        if !shared.shutdown.load(Ordering::Acquire) {
                            handler(&mut state, job);
                        }
                        shared.job_done();
                    }
                    state
                })
            })
            .collect();

        ThreadPool {
            job_tx: Some(job_tx),
            workers,
            shared,
        }
    }

    /// Queue one job, blocking while the queue is full. Returns `false`
    /// only if the pool is already shut down.
    pub fn submit(&self, job: J) -> bool {
        {
            let mut pending = self.shared.pending.lock().expect("pool lock poisoned");
            *pending += 1;
        }
        let Some(job_tx) = self.job_tx.as_ref() else {
            self.shared.job_done();
            return false;
        };
        if job_tx.send(job).is_err() {
            self.shared.job_done();
            return false;
        }
        true
    }

    /// Block until every submitted job has been fully processed.
    ///
    /// This is the barrier the orchestrator uses before merging worker
    /// results; it does not stop the workers.
    pub fn wait_idle(&self) {
        let mut pending = self.shared.pending.lock().expect("pool lock poisoned");
        while *pending > 0 {
            pending = self.shared.idle.wait(pending).expect("pool lock poisoned");
        }
    }

    /// Shut down: wake every worker (idle ones included), join them all,
    /// and hand back the per-worker states in worker-index order.
    ///
    /// Jobs still queued at this point are drained without being
    /// executed; in the intended flow `wait_idle` has already confirmed
    /// the queue is empty.
    pub fn stop_and_join(mut self) -> Vec<S> {
        self.shared.shutdown.store(true, Ordering::Release);
        // Closing the channel is the wake-up: recv() fails once drained.
        self.job_tx.take();
        self.workers
            .drain(..)
            .map(|worker| worker.join().expect("worker thread panicked"))
            .collect()
    }
}
