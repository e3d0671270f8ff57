//! Bounded concurrent materialization

use super::types::EntityStream;
use crate::error::Result;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::future::Future;

/// Default number of concurrent materialize operations
pub const DEFAULT_PREFETCH_WORKERS: usize = 5;

type MaterializeFn<T, U> = Box<dyn Fn(T) -> BoxFuture<'static, Result<U>> + Send + Sync>;

/// Eager concurrent drain of a paginated source
///
/// Pulls entities from the source page by page (pages are requested as
/// capacity frees up, never buffered entirely up front), runs the
/// materialize operation for up to `workers` entities at a time, and yields
/// results in **completion order**. Callers that need the original server
/// order must drain the iterator directly instead.
///
/// Materialize failures are not caught here: each error is yielded to the
/// consumer when that entity's future resolves. A page-fetch error is
/// yielded in place; entities already in flight still complete and can be
/// consumed afterwards.
///
/// All in-flight work lives inside this value and is cancelled when it is
/// dropped; nothing outlives the drain.
pub struct Prefetch<T, U> {
    source: Box<dyn EntityStream<T> + Send>,
    materialize: MaterializeFn<T, U>,
    in_flight: FuturesUnordered<BoxFuture<'static, Result<U>>>,
    workers: usize,
    source_done: bool,
}

impl<T: Send + 'static, U: Send + 'static> Prefetch<T, U> {
    /// Wrap a source with a materialize operation and a worker bound
    pub fn new<F, Fut>(
        source: Box<dyn EntityStream<T> + Send>,
        workers: usize,
        materialize: F,
    ) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U>> + Send + 'static,
    {
        Self {
            source,
            materialize: Box::new(move |entity| materialize(entity).boxed()),
            in_flight: FuturesUnordered::new(),
            workers: workers.max(1),
            source_done: false,
        }
    }

    /// Yield the next completed result; `None` once every submitted entity
    /// has been yielded exactly once
    pub async fn next(&mut self) -> Option<Result<U>> {
        loop {
            while !self.source_done && self.in_flight.len() < self.workers {
                match self.source.next().await {
                    Ok(Some(entity)) => self.in_flight.push((self.materialize)(entity)),
                    Ok(None) => self.source_done = true,
                    Err(e) => {
                        self.source_done = true;
                        return Some(Err(e));
                    }
                }
            }
            match self.in_flight.next().await {
                Some(result) => return Some(result),
                None if self.source_done => return None,
                None => {}
            }
        }
    }

    /// Drain every result, failing on the first error
    pub async fn drain(mut self) -> Result<Vec<U>> {
        let mut out = Vec::new();
        while let Some(result) = self.next().await {
            out.push(result?);
        }
        Ok(out)
    }
}
