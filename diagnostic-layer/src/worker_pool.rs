//! Shared protocol for the shader- and pipeline-compiler worker pools (§4.3, §4.4).
//!
//! Both compilers push batches of jobs and are notified once, on a worker thread, when
//! the last job of a batch retires. The only thing that differs between them is what a
//! "job" does; that is captured by the [`Job`] trait, and [`WorkerPool`] is generic over
//! it. Workers are lazily spawned on the first `push`, matching the source's behaviour of
//! never owning idle threads before there is work.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// A unit of work a [`WorkerPool`] can run. `run` is called on a worker thread with no
/// locks held by the pool.
pub trait Job: Send + 'static {
    fn run(self);
}

/// A monotonic integer published by the pool each time work is enqueued, and again when
/// it retires. See the glossary's "Commit".
pub type Commit = u64;

struct Batch<T> {
    job: T,
}

enum Envelope<T> {
    Job { job: T, context: Arc<BatchContext> },
    Exit,
}

struct BatchContext {
    pending: AtomicUsize,
    completion: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

struct Shared<T> {
    queue: Mutex<std::collections::VecDeque<Envelope<T>>>,
    wake: Condvar,
    commit_index: AtomicU64,
    complete_counter: AtomicU64,
    /// Coarse lock a completion functor holds for its duration, so that callers
    /// aggregating multiple completions observe a consistent view. Mirrors the
    /// "completion-step lock" in the design notes.
    completion_step: Mutex<()>,
    exit: std::sync::atomic::AtomicBool,
}

/// A parallel worker pool that runs jobs with per-batch completion notification.
///
/// `commit_index` increments strictly in `push()` call order. `complete_counter`
/// increments strictly in job-retirement order, which may differ from push order:
/// nothing here assumes batches retire in the order they were pushed, only that each
/// batch's own completion fires exactly once, when its last job retires.
pub struct WorkerPool<T: Job> {
    shared: Arc<Shared<T>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl<T: Job> WorkerPool<T> {
    /// Creates a pool with `worker_count` workers, lazily spawned on first `push`. `0`
    /// defers to the number of logical CPUs.
    pub fn new(worker_count: usize) -> Self {
        let worker_count = if worker_count == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            worker_count
        };
        WorkerPool {
            shared: Arc::new(Shared {
                queue: Mutex::new(std::collections::VecDeque::new()),
                wake: Condvar::new(),
                commit_index: AtomicU64::new(0),
                complete_counter: AtomicU64::new(0),
                completion_step: Mutex::new(()),
                exit: std::sync::atomic::AtomicBool::new(false),
            }),
            workers: Mutex::new(Vec::new()),
            worker_count,
        }
    }

    fn ensure_workers_spawned(&self) {
        let mut workers = self.workers.lock();
        if !workers.is_empty() {
            return;
        }
        for _ in 0..self.worker_count {
            let shared = Arc::clone(&self.shared);
            workers.push(std::thread::spawn(move || worker_loop(shared)));
        }
    }

    /// Enqueues `jobs` as a single batch; `completion` runs exactly once, on a worker
    /// thread, when the last job in the batch retires. Returns the commit assigned to
    /// this push; `is_commit_pushed(commit)` becomes true once that job has run.
    pub fn push(
        &self,
        jobs: Vec<T>,
        completion: impl FnOnce() + Send + 'static,
    ) -> Commit {
        self.ensure_workers_spawned();
        let n = jobs.len();
        let commit = self.shared.commit_index.fetch_add(1, Ordering::AcqRel);
        if n == 0 {
            completion();
            self.shared.complete_counter.fetch_add(1, Ordering::AcqRel);
            return commit;
        }
        let context = Arc::new(BatchContext {
            pending: AtomicUsize::new(n),
            completion: Mutex::new(Some(Box::new(completion))),
        });
        let mut queue = self.shared.queue.lock();
        for job in jobs {
            queue.push_back(Envelope::Job {
                job,
                context: Arc::clone(&context),
            });
        }
        drop(queue);
        self.shared.wake.notify_all();
        commit
    }

    /// `true` iff `commit` has retired: all jobs belonging to it have run and its
    /// completion functor has been invoked.
    pub fn is_commit_pushed(&self, commit: Commit) -> bool {
        commit < self.shared.complete_counter.load(Ordering::Acquire)
    }

    /// Saturating `commit - complete_counter`.
    pub fn pending_commits(&self, commit: Commit) -> u64 {
        let complete = self.shared.complete_counter.load(Ordering::Acquire);
        commit.saturating_sub(complete)
    }

    /// The current commit counter value (next commit to be assigned).
    pub fn commit_index(&self) -> Commit {
        self.shared.commit_index.load(Ordering::Acquire)
    }
}

impl<T: Job> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.shared.exit.store(true, Ordering::Release);
        self.shared.wake.notify_all();
        let mut workers = self.workers.lock();
        for worker in workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop<T: Job>(shared: Arc<Shared<T>>) {
    loop {
        let envelope = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(envelope) = queue.pop_front() {
                    break envelope;
                }
                if shared.exit.load(Ordering::Acquire) {
                    return;
                }
                shared.wake.wait(&mut queue);
            }
        };
        match envelope {
            Envelope::Exit => return,
            Envelope::Job { job, context } => {
                job.run();
                if context.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let _step = shared.completion_step.lock();
                    if let Some(completion) = context.completion.lock().take() {
                        completion();
                    }
                    shared.complete_counter.fetch_add(1, Ordering::AcqRel);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    struct Echo(u32, mpsc::Sender<u32>);
    impl Job for Echo {
        fn run(self) {
            let _ = self.1.send(self.0);
        }
    }

    #[test]
    fn batch_completion_fires_once_after_last_job() {
        let pool: WorkerPool<Echo> = WorkerPool::new(2);
        let (tx, rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let jobs = (0..8).map(|i| Echo(i, tx.clone())).collect();
        let commit = pool.push(jobs, move || {
            done_tx.send(()).unwrap();
        });
        done_rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert!(pool.is_commit_pushed(commit));
        let mut seen: Vec<_> = rx.try_iter().collect();
        seen.sort();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn empty_batch_completes_immediately() {
        let pool: WorkerPool<Echo> = WorkerPool::new(1);
        let (done_tx, done_rx) = mpsc::channel();
        let commit = pool.push(Vec::new(), move || done_tx.send(()).unwrap());
        done_rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert!(pool.is_commit_pushed(commit));
    }
}
