//! Flow-control backends - the implementations the facade forwards to

use crate::core::{config::BackendKind, FlowError, Task};
use crate::flow::{FuturesBackend, TokioBackend};
use async_trait::async_trait;
use std::future::Future;

/// Trait for flow-control backends - allows for different implementations
///
/// Every backend honours the same contract:
/// - empty input completes immediately with no results
/// - results come back in input order, whatever the completion order
/// - the first error completes the flow; work not yet started never starts
/// - series variants never start element `i + 1` before element `i` finished
/// - a limit of 0 is treated as 1
#[async_trait]
pub trait FlowBackend: Send + Sync {
    /// Run all tasks concurrently
    async fn parallel<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static;

    /// Run tasks concurrently, at most `limit` at a time
    async fn parallel_limit<T, E>(
        &self,
        tasks: Vec<Task<T, E>>,
        limit: usize,
    ) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static;

    /// Run tasks one after another
    async fn series<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static;

    /// Call `iterator` once per item, concurrently
    async fn each<I, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static;

    /// Call `iterator` once per item, at most `limit` at a time
    async fn each_limit<I, F, Fut, E>(
        &self,
        items: Vec<I>,
        limit: usize,
        iterator: F,
    ) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static;

    /// Call `iterator` once per item, in order
    async fn each_series<I, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static;

    /// Transform every item concurrently
    async fn map<I, U, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<Vec<U>, FlowError<E>>
    where
        I: Send,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static;

    /// Transform every item, at most `limit` at a time
    async fn map_limit<I, U, F, Fut, E>(
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
        E: Send + 'static;

    /// Transform every item, in order
    async fn map_series<I, U, F, Fut, E>(
        &self,
        items: Vec<I>,
        iterator: F,
    ) -> Result<Vec<U>, FlowError<E>>
    where
        I: Send,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static;
}

/// Backend picked at runtime, e.g. from a [`FlowConfig`](crate::core::config::FlowConfig)
#[derive(Debug, Clone)]
pub enum Backend {
    Futures(FuturesBackend),
    Tokio(TokioBackend),
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Futures(FuturesBackend::new())
    }
}

impl Backend {
    pub fn from_kind(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Futures => Backend::Futures(FuturesBackend::new()),
            BackendKind::Tokio => Backend::Tokio(TokioBackend::new()),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Futures(_) => BackendKind::Futures,
            Backend::Tokio(_) => BackendKind::Tokio,
        }
    }
}

#[async_trait]
impl FlowBackend for Backend {
    async fn parallel<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        match self {
            Backend::Futures(backend) => backend.parallel(tasks).await,
            Backend::Tokio(backend) => backend.parallel(tasks).await,
        }
    }

    async fn parallel_limit<T, E>(
        &self,
        tasks: Vec<Task<T, E>>,
        limit: usize,
    ) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        match self {
            Backend::Futures(backend) => backend.parallel_limit(tasks, limit).await,
            Backend::Tokio(backend) => backend.parallel_limit(tasks, limit).await,
        }
    }

    async fn series<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        match self {
            Backend::Futures(backend) => backend.series(tasks).await,
            Backend::Tokio(backend) => backend.series(tasks).await,
        }
    }

    async fn each<I, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        match self {
            Backend::Futures(backend) => backend.each(items, iterator).await,
            Backend::Tokio(backend) => backend.each(items, iterator).await,
        }
    }

    async fn each_limit<I, F, Fut, E>(
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
        match self {
            Backend::Futures(backend) => backend.each_limit(items, limit, iterator).await,
            Backend::Tokio(backend) => backend.each_limit(items, limit, iterator).await,
        }
    }

    async fn each_series<I, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        match self {
            Backend::Futures(backend) => backend.each_series(items, iterator).await,
            Backend::Tokio(backend) => backend.each_series(items, iterator).await,
        }
    }

    async fn map<I, U, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<Vec<U>, FlowError<E>>
    where
        I: Send,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static,
    {
        match self {
            Backend::Futures(backend) => backend.map(items, iterator).await,
            Backend::Tokio(backend) => backend.map(items, iterator).await,
        }
    }

    async fn map_limit<I, U, F, Fut, E>(
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
        match self {
            Backend::Futures(backend) => backend.map_limit(items, limit, iterator).await,
            Backend::Tokio(backend) => backend.map_limit(items, limit, iterator).await,
        }
    }

    async fn map_series<I, U, F, Fut, E>(
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
        match self {
            Backend::Futures(backend) => backend.map_series(items, iterator).await,
            Backend::Tokio(backend) => backend.map_series(items, iterator).await,
        }
    }
}
