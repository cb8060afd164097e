//! Completion errors reported by a flow

use std::future::Future;
use thiserror::Error;

/// Error a flow completes with.
///
/// The caller's own error is carried untouched in [`FlowError::Task`],
/// together with the position of the task or item that produced it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError<E> {
    /// A task (or the iterator, for `each`/`map`) returned an error
    #[error("task {index} failed: {error}")]
    Task { index: usize, error: E },

    /// A spawned task was cancelled by the runtime before it completed
    #[error("task {index} was cancelled before completing")]
    Cancelled { index: usize },
}

impl<E> FlowError<E> {
    /// Position of the task or item that failed or was cancelled
    pub fn index(&self) -> usize {
        match self {
            FlowError::Task { index, .. } | FlowError::Cancelled { index } => *index,
        }
    }

    /// Borrow the caller's error
    pub fn task_error(&self) -> Option<&E> {
        match self {
            FlowError::Task { error, .. } => Some(error),
            FlowError::Cancelled { .. } => None,
        }
    }

    /// Take back the caller's error, exactly as the task produced it
    pub fn into_task_error(self) -> Option<E> {
        match self {
            FlowError::Task { error, .. } => Some(error),
            FlowError::Cancelled { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FlowError::Cancelled { .. })
    }
}

/// Await `future` and tag its error with `index`
pub(crate) async fn at_index<T, E, F>(index: usize, future: F) -> Result<T, FlowError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    future.await.map_err(|error| FlowError::Task { index, error })
}
