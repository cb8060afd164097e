//! Units of asynchronous work handed to a flow

use futures_util::future::BoxFuture;
use std::future::Future;

/// A boxed unit of work resolving to `Ok(value)` or `Err(error)`.
///
/// Futures are lazy, so a `Task` does nothing until a backend polls it.
/// That is what lets `series` hold a whole list of tasks and still start
/// them one at a time.
pub type Task<T, E> = BoxFuture<'static, Result<T, E>>;

/// Box a future into a [`Task`]
pub fn task<T, E, F>(future: F) -> Task<T, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
{
    Box::pin(future)
}
