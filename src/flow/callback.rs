//! Completion-callback flavour of the facade
//!
//! Each `*_then` operation spawns the forwarded flow on the tokio runtime and
//! hands its result to `done` exactly once, when the backend completes.
//! `Ok(..)` plays the part of an empty error slot, `Err(..)` carries the error.

use crate::core::{FlowError, Task};
use crate::flow::{Flow, FlowBackend};
use std::future::Future;
use tokio::task::JoinHandle;

impl<B> Flow<B>
where
    B: FlowBackend + Clone + 'static,
{
    /// Spawn [`Flow::parallel`] and pass its result to `done`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn parallel_then<T, E, C>(&self, tasks: Vec<Task<T, E>>, done: C) -> JoinHandle<()>
    where
        T: Send + 'static,
        E: Send + 'static,
        C: FnOnce(Result<Vec<T>, FlowError<E>>) + Send + 'static,
    {
        let flow = self.clone();
        tokio::spawn(async move { done(flow.parallel(tasks).await) })
    }

    /// Spawn [`Flow::series`] and pass its result to `done`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn series_then<T, E, C>(&self, tasks: Vec<Task<T, E>>, done: C) -> JoinHandle<()>
    where
        T: Send + 'static,
        E: Send + 'static,
        C: FnOnce(Result<Vec<T>, FlowError<E>>) + Send + 'static,
    {
        let flow = self.clone();
        tokio::spawn(async move { done(flow.series(tasks).await) })
    }

    /// Spawn [`Flow::each_parallel`] and pass its result to `done`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn each_parallel_then<I, F, Fut, E, C>(
        &self,
        items: Vec<I>,
        iterator: F,
        done: C,
    ) -> JoinHandle<()>
    where
        I: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
        C: FnOnce(Result<(), FlowError<E>>) + Send + 'static,
    {
        let flow = self.clone();
        tokio::spawn(async move { done(flow.each_parallel(items, iterator).await) })
    }

    /// Spawn [`Flow::each_series`] and pass its result to `done`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn each_series_then<I, F, Fut, E, C>(
        &self,
        items: Vec<I>,
        iterator: F,
        done: C,
    ) -> JoinHandle<()>
    where
        I: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
        C: FnOnce(Result<(), FlowError<E>>) + Send + 'static,
    {
        let flow = self.clone();
        tokio::spawn(async move { done(flow.each_series(items, iterator).await) })
    }

    /// Spawn [`Flow::map_parallel`] and pass its result to `done`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn map_parallel_then<I, U, F, Fut, E, C>(
        &self,
        items: Vec<I>,
        iterator: F,
        done: C,
    ) -> JoinHandle<()>
    where
        I: Send + 'static,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static,
        C: FnOnce(Result<Vec<U>, FlowError<E>>) + Send + 'static,
    {
        let flow = self.clone();
        tokio::spawn(async move { done(flow.map_parallel(items, iterator).await) })
    }

    /// Spawn [`Flow::map_series`] and pass its result to `done`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn map_series_then<I, U, F, Fut, E, C>(
        &self,
        items: Vec<I>,
        iterator: F,
        done: C,
    ) -> JoinHandle<()>
    where
        I: Send + 'static,
        U: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Send + 'static,
        C: FnOnce(Result<Vec<U>, FlowError<E>>) + Send + 'static,
    {
        let flow = self.clone();
        tokio::spawn(async move { done(flow.map_series(items, iterator).await) })
    }
}
