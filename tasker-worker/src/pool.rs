//! Bounded worker pool.
//!
//! Rust has no direct equivalent of Python's `ThreadPoolExecutor`, so this
//! emulates one with a fixed number of persistent tokio tasks pulling jobs
//! off a shared queue — `WORKER_NUM` workers, unbounded job queue, exactly
//! the executor's submission semantics without the thread-per-submission
//! cost the original avoided too.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Liveness of one pool worker, for `get_self_status`.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadStatus {
    pub thread_id: usize,
    pub alive: bool,
}

/// `Tasker::get_self_status()`'s payload.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    pub threads_alive: Vec<ThreadStatus>,
    pub max_threads: usize,
}

/// A fixed-size pool of persistent workers draining a shared job queue.
pub struct WorkerPool {
    sender: mpsc::UnboundedSender<Job>,
    handles: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.handles.len())
            .finish()
    }
}

impl WorkerPool {
    /// Spawns `worker_num` persistent workers. `worker_num` of zero means
    /// jobs are accepted but never run — callers are expected to size the
    /// pool from `orchestrator.tasker.workers` before submitting work.
    pub fn new(worker_num: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..worker_num)
            .map(|_| {
                let receiver = receiver.clone();
                tokio::spawn(async move {
                    loop {
                        let job = {
                            let mut receiver = receiver.lock().await;
                            receiver.recv().await
                        };
                        match job {
                            Some(job) => job.await,
                            None => break,
                        }
                    }
                })
            })
            .collect();

        Self { sender, handles }
    }

    /// Queues `job` for execution on the next free worker. Never blocks:
    /// the queue is unbounded, matching the original's
    /// `ThreadPoolExecutor.submit` which never rejects work either.
    pub fn submit<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // An error here means every worker task panicked and dropped the
        // receiver; there is nothing left to run the job on regardless.
        let _ = self.sender.send(Box::pin(job));
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            threads_alive: self
                .handles
                .iter()
                .enumerate()
                .map(|(thread_id, handle)| ThreadStatus {
                    thread_id,
                    alive: !handle.is_finished(),
                })
                .collect(),
            max_threads: self.handles.len(),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn submitted_jobs_run() {
        let pool = WorkerPool::new(2);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let counter = counter.clone();
            pool.submit(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn status_reports_max_threads() {
        let pool = WorkerPool::new(3);
        let status = pool.status();
        assert_eq!(status.max_threads, 3);
        assert!(status.threads_alive.iter().all(|t| t.alive));
    }
}
