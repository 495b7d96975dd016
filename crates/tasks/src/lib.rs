//! Task spawning tied to a process-wide shutdown signal.
//!
//! A [`TaskManager`] owns the [`Signal`]; the [`TaskExecutor`] it hands out is
//! cheap to clone and spawns tasks on the tokio runtime. Long-running tasks
//! receive a [`Shutdown`] future and are expected to return once it resolves.

mod metrics;
mod shutdown;

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span};

use crate::metrics::{IncCounterOnDrop, TaskExecutorMetrics};
pub use crate::shutdown::{Shutdown, Signal, signal};

/// Owns the shutdown signal for every task spawned through its executor.
#[derive(Debug)]
pub struct TaskManager {
    signal: Option<Signal>,
    executor: TaskExecutor,
}

impl TaskManager {
    pub fn new(handle: Handle) -> Self {
        let (signal, on_shutdown) = signal();
        Self {
            signal: Some(signal),
            executor: TaskExecutor {
                handle,
                on_shutdown,
                metrics: TaskExecutorMetrics::default(),
            },
        }
    }

    /// Create a manager on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn executor(&self) -> TaskExecutor {
        self.executor.clone()
    }

    /// Fire the shutdown signal. Subsequent calls do nothing.
    pub fn graceful_shutdown(&mut self) {
        if let Some(signal) = self.signal.take() {
            debug!("firing shutdown signal");
            signal.fire();
        }
    }
}

/// Spawns tasks that stop on the manager's shutdown signal.
#[derive(Debug, Clone)]
pub struct TaskExecutor {
    handle: Handle,
    on_shutdown: Shutdown,
    metrics: TaskExecutorMetrics,
}

impl TaskExecutor {
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Future resolving when shutdown is signalled.
    pub fn on_shutdown_signal(&self) -> Shutdown {
        self.on_shutdown.clone()
    }

    /// Spawn a task that is dropped at shutdown.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.metrics.inc_regular_tasks();
        let finished = IncCounterOnDrop::new(self.metrics.finished_regular_tasks_total.clone());
        let on_shutdown = self.on_shutdown.clone();

        self.handle.spawn(async move {
            let _finished = finished;
            tokio::select! {
                _ = on_shutdown => {}
                _ = fut => {}
            }
        })
    }

    /// Spawn a task that receives the shutdown signal and winds down itself.
    pub fn spawn_with_graceful_shutdown_signal<F, Fut>(
        &self,
        name: &'static str,
        f: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Shutdown) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.metrics.inc_graceful_tasks();
        let finished = IncCounterOnDrop::new(self.metrics.finished_graceful_tasks_total.clone());
        let fut = f(self.on_shutdown.clone());

        self.handle.spawn(
            async move {
                let _finished = finished;
                fut.await;
                debug!("task finished");
            }
            .instrument(debug_span!("task", name)),
        )
    }
}
