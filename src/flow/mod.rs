//! Flow control: the facade, its backends, and scheduling modes
//!
//! The free functions in this module forward to a default [`Flow`] over the
//! [`FuturesBackend`].

pub mod backend;
pub mod callback;
pub mod facade;
pub mod futures_backend;
pub mod mode;
pub mod tokio_backend;

pub use backend::{Backend, FlowBackend};
pub use facade::Flow;
pub use futures_backend::FuturesBackend;
pub use mode::Mode;
pub use tokio_backend::TokioBackend;

use crate::core::{FlowError, Task};
use std::future::Future;

fn default_flow() -> Flow<FuturesBackend> {
    Flow::new(FuturesBackend::new())
}

/// Run every task concurrently. See [`Flow::parallel`].
pub async fn parallel<T, E>(tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    default_flow().parallel(tasks).await
}

/// Run tasks one after another. See [`Flow::series`].
pub async fn series<T, E>(tasks: Vec<Task<T, E>>) -> Result<Vec<T>, FlowError<E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    default_flow().series(tasks).await
}

/// See [`Flow::each_parallel`].
pub async fn each_parallel<I, F, Fut, E>(items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
where
    I: Send,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Send + 'static,
{
    default_flow().each_parallel(items, iterator).await
}

/// See [`Flow::each_series`].
pub async fn each_series<I, F, Fut, E>(items: Vec<I>, iterator: F) -> Result<(), FlowError<E>>
where
    I: Send,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Send + 'static,
{
    default_flow().each_series(items, iterator).await
}

/// See [`Flow::map_parallel`].
pub async fn map_parallel<I, U, F, Fut, E>(items: Vec<I>, iterator: F) -> Result<Vec<U>, FlowError<E>>
where
    I: Send,
    U: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<U, E>> + Send + 'static,
    E: Send + 'static,
{
    default_flow().map_parallel(items, iterator).await
}

/// See [`Flow::map_series`].
pub async fn map_series<I, U, F, Fut, E>(items: Vec<I>, iterator: F) -> Result<Vec<U>, FlowError<E>>
where
    I: Send,
    U: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<U, E>> + Send + 'static,
    E: Send + 'static,
{
    default_flow().map_series(items, iterator).await
}
