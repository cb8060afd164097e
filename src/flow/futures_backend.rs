//! Backend that drives all work inside the awaiting task with `futures-util`

use crate::core::{error::at_index, FlowError, Task};
use crate::flow::FlowBackend;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use tracing::debug;

/// Concurrency without spawning: futures are multiplexed on the caller's task.
///
/// Work that is still in flight when the flow short-circuits is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuturesBackend;

impl FuturesBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Drive `futures` with at most `limit` in flight, reporting the first error
/// as soon as it happens and the results in input order otherwise.
async fn run_limited<T, E, Fut>(
    futures: impl Iterator<Item = Fut> + Send,
    limit: usize,
) -> Result<Vec<T>, FlowError<E>>
where
    T: Send,
    E: Send,
    Fut: Future<Output = Result<T, E>> + Send,
{
    let limit = limit.max(1);
    let mut pending = futures.enumerate();
    let mut in_flight = FuturesUnordered::new();
    let mut slots: Vec<Option<T>> = Vec::new();

    loop {
        while in_flight.len() < limit {
            let Some((index, future)) = pending.next() else {
                break;
            };
            slots.push(None);
            in_flight.push(async move { (index, future.await) });
        }

        let Some((index, outcome)) = in_flight.next().await else {
            break;
        };
        slots[index] = Some(outcome.map_err(|error| FlowError::Task { index, error })?);
        debug!(index, limit, "limited unit finished");
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Drive `futures` one at a time, stopping at the first error
async fn run_in_order<T, E, Fut>(
    futures: impl Iterator<Item = Fut> + Send,
) -> Result<Vec<T>, FlowError<E>>
where
    T: Send,
    E: Send,
    Fut: Future<Output = Result<T, E>> + Send,
{
    let mut results = Vec::new();
    for (index, future) in futures.enumerate() {
        results.push(at_index(index, future).await?);
        debug!(index, "series unit finished");
    }
    Ok(results)
}

#[async_trait]
impl FlowBackend for FuturesBackend {
    async fn parallel<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        debug!(tasks = tasks.len(), "futures backend: parallel");
        try_join_all(
            tasks
                .into_iter()
                .enumerate()
                .map(|(index, task)| at_index(index, task)),
        )
        .await
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
        debug!(tasks = tasks.len(), limit, "futures backend: parallel_limit");
        run_limited(tasks.into_iter(), limit).await
    }

    async fn series<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        debug!(tasks = tasks.len(), "futures backend: series");
        run_in_order(tasks.into_iter()).await
    }

    async fn each<I, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "futures backend: each");
        try_join_all(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| at_index(index, iterator(item))),
        )
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
        debug!(items = items.len(), limit, "futures backend: each_limit");
        run_limited(items.into_iter().map(&iterator), limit).await?;
        Ok(())
    }

    async fn each_series<I, F, Fut, E>(&self, items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
    where
        I: Send,
        F: Fn(I) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        debug!(items = items.len(), "futures backend: each_series");
        run_in_order(items.into_iter().map(&iterator)).await?;
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
        debug!(items = items.len(), "futures backend: map");
        try_join_all(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| at_index(index, iterator(item))),
        )
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
        debug!(items = items.len(), limit, "futures backend: map_limit");
        run_limited(items.into_iter().map(&iterator), limit).await
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
        debug!(items = items.len(), "futures backend: map_series");
        run_in_order(items.into_iter().map(&iterator)).await
    }
}
