//! The flow-control facade - a stable set of operations forwarded to a backend

use crate::core::{config::FlowConfig, FlowError, Task};
use crate::flow::{Backend, FlowBackend, FuturesBackend, Mode};
use std::future::Future;
use tracing::debug;

/// Stateless facade over a [`FlowBackend`].
///
/// Every operation hands its arguments to the backend unchanged and returns
/// whatever the backend completes with. Swapping the backend changes how the
/// work is driven without changing any caller.
#[derive(Debug, Clone, Default)]
pub struct Flow<B = FuturesBackend> {
    backend: B,
}

impl<B: FlowBackend> Flow<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run every task concurrently; results come back in task order
    pub async fn parallel<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        debug!(tasks = tasks.len(), "parallel");
        self.backend.parallel(tasks).await
    }

    /// Run tasks concurrently with at most `limit` in flight
    pub async fn parallel_limit<T, E>(
        &self,
        tasks: Vec<Task<T, E>>,
        limit: usize,
    ) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        debug!(tasks = tasks.len(), limit, "parallel_limit");
        self.backend.parallel_limit(tasks, limit).await
    }

    /// Run tasks one after another, stopping at the first error
    pub async fn series<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        debug!(tasks = tasks.len(), "series");
        self.backend.series(tasks).await
    }

    /// Run tasks the way `mode` says
    pub async fn run<T, E>(&self, tasks: Vec<Task<T, E>>, mode: Mode) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        match mode {
            Mode::Series => self.series(tasks).await,
            Mode::Parallel => self.parallel(tasks).await,
            Mode::Limited(limit) => self.parallel_limit(tasks, limit).await,
        }
    }

    /// Call `iterator` for every item concurrently
    pub async fn each_parallel<I, F, Fut, E>(
        &self,
        items: Vec<I>,
        iterator: F,
    ) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "each_parallel");
        self.backend.each(items, iterator).await
    }

    /// Call `iterator` for every item with at most `limit` in flight
    pub async fn each_limit<I, F, Fut, E>(
        &self,
        items: Vec<I>,
        limit: usize,
        iterator: F,
    ) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), limit, "each_limit");
        self.backend.each_limit(items, limit, iterator).await
    }

    /// Call `iterator` for every item in order, stopping at the first error
    pub async fn each_series<I, F, Fut, E>(
        &self,
        items: Vec<I>,
        iterator: F,
    ) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "each_series");
        self.backend.each_series(items, iterator).await
    }

    /// Transform every item concurrently; results keep the input order
    pub async fn map_parallel<I, U, F, Fut, E>(
        &self,
        items: Vec<I>,
        iterator: F,
    ) -> Result<Vec<U>, FlowError<E>>
    where
        I: Send,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "map_parallel");
        self.backend.map(items, iterator).await
    }

    /// Transform every item with at most `limit` in flight
    pub async fn map_limit<I, U, F, Fut, E>(
        &self,
        items: Vec<I>,
        limit: usize,
        iterator: F,
    ) -> Result<Vec<U>, FlowError<E>>
    where
        I: Send,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), limit, "map_limit");
        self.backend.map_limit(items, limit, iterator).await
    }

    /// Transform every item in order
    pub async fn map_series<I, U, F, Fut, E>(
        &self,
        items: Vec<I>,
        iterator: F,
    ) -> Result<Vec<U>, FlowError<E>>
    where
        I: Send,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "map_series");
        self.backend.map_series(items, iterator).await
    }
}

impl Flow<Backend> {
    /// Build a facade over the backend named in `config`
    pub fn from_config(config: &FlowConfig) -> Self {
        Self::new(Backend::from_kind(config.backend))
    }
}
