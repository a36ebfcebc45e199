//! Bounded-concurrency task pool.
//!
//! Preprocessor invocations are dominated by process spawn and I/O
//! wait, so tasks run concurrently — but capped, or a large
//! compile_commands.json would fork hundreds of compilers at once.
//! Admission waits on a semaphore *before* the task is spawned, so the
//! bound holds for spawned work, not just polled work. A failing task
//! is logged and counted; its siblings keep running, and `run_tasks`
//! returns only once every task has completed or failed.

use std::future::Future;
use std::sync::Arc;
use std::thread;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::error::Result;

/// Default concurrency limit: half the hardware parallelism, at least
/// one.
pub fn default_parallelism() -> usize {
    let hardware = thread::available_parallelism().map(|n| n.get()).unwrap_or(2);
    (hardware / 2).max(1)
}

/// Outcome counts for one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub completed: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.completed + self.failed
    }
}

/// Run `worker` over every task with at most `limit` in flight.
pub async fn run_tasks<T, F, Fut>(tasks: Vec<T>, limit: usize, worker: F) -> RunReport
where
    T: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut set = JoinSet::new();
    let mut report = RunReport::default();

    for task in tasks {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            // The semaphore is never closed; count rather than panic if
            // that ever changes.
            Err(_) => {
                report.failed += 1;
                continue;
            }
        };
        let fut = worker(task);
        set.spawn(async move {
            let _permit = permit;
            fut.await
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok(())) => report.completed += 1,
            Ok(Err(error)) => {
                warn!(%error, "task failed");
                report.failed += 1;
            }
            Err(error) => {
                warn!(%error, "task panicked");
                report.failed += 1;
            }
        }
    }
    report
}
