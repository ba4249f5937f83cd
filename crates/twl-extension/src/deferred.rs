//! Deferred updates: work that runs after the triggering request is done.
//!
//! Hooks push closures through a [`DeferredUpdates`] handle and return at
//! once. The [`DeferredRunner`] executes them on blocking tasks, each one on
//! its own, in no particular order. A panic stays inside its task and is
//! logged by the runner.

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

type Work = Box<dyn FnOnce() + Send + 'static>;

struct DeferredUpdate {
    name: &'static str,
    work: Work,
}

/// Create a connected handle and runner.
pub fn deferred_queue() -> (DeferredUpdates, DeferredRunner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DeferredUpdates { tx }, DeferredRunner { rx })
}

/// Cloneable handle for scheduling deferred updates.
#[derive(Clone)]
pub struct DeferredUpdates {
    tx: mpsc::UnboundedSender<DeferredUpdate>,
}

impl DeferredUpdates {
    /// Schedule `work`. Never blocks.
    ///
    /// Returns `false` if the runner is gone, in which case the work is dropped.
    pub fn add_callable_update<F>(&self, name: &'static str, work: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let update = DeferredUpdate { name, work: Box::new(work) };
        match self.tx.send(update) {
            Ok(()) => true,
            Err(_) => {
                debug!(update = name, "deferred runner stopped, dropping update");
                false
            }
        }
    }
}

/// Counts from a runner pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerStats {
    pub completed: usize,
    pub panicked: usize,
}

impl RunnerStats {
    fn record(&mut self, result: Result<(), JoinError>) {
        match result {
            Ok(()) => self.completed += 1,
            Err(e) if e.is_panic() => {
                error!("deferred update panicked");
                self.panicked += 1;
            }
            Err(e) => error!("deferred update did not finish: {}", e),
        }
    }
}

/// Executes scheduled updates.
pub struct DeferredRunner {
    rx: mpsc::UnboundedReceiver<DeferredUpdate>,
}

impl DeferredRunner {
    /// Run until every [`DeferredUpdates`] handle is dropped, then wait for
    /// in-flight updates.
    pub async fn run(mut self) -> RunnerStats {
        let mut tasks = JoinSet::new();
        let mut stats = RunnerStats::default();

        loop {
            tokio::select! {
                update = self.rx.recv() => match update {
                    Some(update) => spawn(&mut tasks, update),
                    None => break,
                },
                Some(result) = tasks.join_next(), if !tasks.is_empty() => stats.record(result),
            }
        }

        while let Some(result) = tasks.join_next().await {
            stats.record(result);
        }
        debug!(completed = stats.completed, panicked = stats.panicked, "deferred runner drained");
        stats
    }

    /// Run whatever is queued right now and wait for it. Updates scheduled
    /// meanwhile are left for the next call.
    pub async fn run_pending(&mut self) -> RunnerStats {
        let mut tasks = JoinSet::new();
        let mut stats = RunnerStats::default();

        while let Ok(update) = self.rx.try_recv() {
            spawn(&mut tasks, update);
        }
        while let Some(result) = tasks.join_next().await {
            stats.record(result);
        }
        stats
    }
}

fn spawn(tasks: &mut JoinSet<()>, update: DeferredUpdate) {
    let DeferredUpdate { name, work } = update;
    let span = tracing::debug_span!("deferred", update = name);
    // Blocking pool: host services are synchronous.
    tasks.spawn_blocking(move || span.in_scope(work));
}
