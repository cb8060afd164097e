//! Backend that spawns every unit of work onto the tokio runtime

use crate::core::{FlowError, Task};
use crate::flow::FlowBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::{Id, JoinSet};
use tracing::{debug, warn};

/// Multi-threaded parallelism: each task or iteration runs as its own tokio task.
///
/// Must be awaited inside a tokio runtime unless built with [`TokioBackend::with_handle`].
/// Panics inside spawned work are resumed on the awaiting task. Work the
/// runtime cancels (e.g. on shutdown) completes the flow with
/// [`FlowError::Cancelled`] naming its index. When the flow short-circuits,
/// outstanding work is aborted.
#[derive(Debug, Clone, Default)]
pub struct TokioBackend {
    handle: Option<Handle>,
}

impl TokioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn onto a specific runtime instead of the current one
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Spawn `futures` keeping at most `limit` running, collect the results in
    /// input order and stop at the first error.
    async fn join_spawned<T, E, Fut>(
        &self,
        futures: impl Iterator<Item = Fut> + Send,
        limit: usize,
    ) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let limit = limit.max(1);
        let mut pending = futures.enumerate();
        let mut set = JoinSet::new();
        let mut spawned: HashMap<Id, usize> = HashMap::new();
        let mut slots: Vec<Option<T>> = Vec::new();

        loop {
            while set.len() < limit {
                let Some((index, future)) = pending.next() else {
                    break;
                };
                slots.push(None);
                let unit = async move { (index, future.await) };
                let abort = match &self.handle {
                    Some(handle) => set.spawn_on(unit, handle),
                    None => set.spawn(unit),
                };
                spawned.insert(abort.id(), index);
            }

            let Some(joined) = set.join_next_with_id().await else {
                break;
            };

            match joined {
                Ok((id, (index, Ok(value)))) => {
                    debug!(index, "spawned unit finished");
                    spawned.remove(&id);
                    slots[index] = Some(value);
                }
                Ok((_, (index, Err(error)))) => {
                    debug!(index, outstanding = set.len(), "spawned unit failed, aborting the rest");
                    set.abort_all();
                    return Err(FlowError::Task { index, error });
                }
                Err(join_error) if join_error.is_panic() => {
                    set.abort_all();
                    std::panic::resume_unwind(join_error.into_panic());
                }
                Err(join_error) => {
                    warn!("Spawned unit did not complete: {}", join_error);
                    set.abort_all();
                    let Some(index) = spawned.remove(&join_error.id()) else {
                        unreachable!("joined a task this set never spawned");
                    };
                    return Err(FlowError::Cancelled { index });
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

#[async_trait]
impl FlowBackend for TokioBackend {
    async fn parallel<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        debug!(tasks = tasks.len(), "tokio backend: parallel");
        let limit = tasks.len();
        self.join_spawned(tasks.into_iter(), limit).await
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
        debug!(tasks = tasks.len(), limit, "tokio backend: parallel_limit");
        self.join_spawned(tasks.into_iter(), limit).await
    }

    async fn series<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        debug!(tasks = tasks.len(), "tokio backend: series");
        self.join_spawned(tasks.into_iter(), 1).await
    }

    async fn each<I, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "tokio backend: each");
        let limit = items.len();
        self.join_spawned(items.into_iter().map(&iterator), limit)
            .await?;
        Ok(())
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
        debug!(items = items.len(), limit, "tokio backend: each_limit");
        self.join_spawned(items.into_iter().map(&iterator), limit)
            .await?;
        Ok(())
    }

    async fn each_series<I, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "tokio backend: each_series");
        self.join_spawned(items.into_iter().map(&iterator), 1).await?;
        Ok(())
    }

    async fn map<I, U, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<Vec<U>, FlowError<E>>
    where
        I: Send,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "tokio backend: map");
        let limit = items.len();
        self.join_spawned(items.into_iter().map(&iterator), limit)
            .await
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
        debug!(items = items.len(), limit, "tokio backend: map_limit");
        self.join_spawned(items.into_iter().map(&iterator), limit)
            .await
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
        debug!(items = items.len(), "tokio backend: map_series");
        self.join_spawned(items.into_iter().map(&iterator), 1).await
    }
}
