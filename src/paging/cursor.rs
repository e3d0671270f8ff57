//! Token-based pagination engine

use super::prefetch::Prefetch;
use super::types::{EntityBuilder, EntityStream, ListFilters, PageFetcher, PageRequest, RawPage};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

/// Lazy iterator over a collection addressed by an opaque continuation token
///
/// Produces a forward-only, single-pass sequence of entities. The first page
/// is fetched on the first consumption attempt, not at construction. The
/// sequence is finite (it terminates when the server returns an empty page
/// with no continuation) and not restartable; construct a fresh iterator to
/// re-traverse.
///
/// Partial consumption via [`next`](CursorIter::next) followed by a bulk
/// drain continues from the exact unconsumed position without dropping,
/// duplicating, or re-fetching anything.
pub struct CursorIter<T> {
    fetcher: Arc<dyn PageFetcher>,
    build: EntityBuilder<T>,
    filters: ListFilters,
    /// Built-but-unconsumed entities of the most recent page
    buffer: VecDeque<T>,
    next_token: Option<String>,
    started: bool,
    done: bool,
}

impl<T: Send + 'static> CursorIter<T> {
    /// Create an iterator bound to fixed request parameters
    ///
    /// If `filters` carries an explicit continuation token, the first fetch
    /// is a token-only request, per the server contract.
    pub fn new(fetcher: Arc<dyn PageFetcher>, build: EntityBuilder<T>, mut filters: ListFilters) -> Self {
        let next_token = filters.token.take();
        Self {
            fetcher,
            build,
            filters,
            buffer: VecDeque::new(),
            next_token,
            started: false,
            done: false,
        }
    }

    /// Pull the next entity; `Ok(None)` once exhausted
    pub async fn next(&mut self) -> Result<Option<T>> {
        if self.buffer.is_empty() {
            self.advance().await?;
        }
        Ok(self.buffer.pop_front())
    }

    /// Return the next batch of entities
    ///
    /// If the current page still has unconsumed entries, they are returned
    /// directly without a fetch. Returns an empty vec once exhausted.
    pub async fn next_page(&mut self) -> Result<Vec<T>> {
        if self.buffer.is_empty() {
            self.advance().await?;
        }
        Ok(self.buffer.drain(..).collect())
    }

    /// Drain every remaining entity, in server order
    pub async fn collect_remaining(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        loop {
            let page = self.next_page().await?;
            if page.is_empty() {
                break;
            }
            items.extend(page);
        }
        Ok(items)
    }

    /// Switch to eager concurrent materialization
    ///
    /// Consumes the iterator and drains it page by page, running
    /// `materialize` for up to `workers` entities at a time. Results are
    /// yielded in completion order, not request order.
    pub fn prefetch<U, F, Fut>(self, workers: usize, materialize: F) -> Prefetch<T, U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U>> + Send + 'static,
    {
        Prefetch::new(Box::new(self), workers, materialize)
    }

    /// Fill the buffer from the server. No-op while unconsumed entries
    /// remain; walks over empty-but-continued pages.
    async fn advance(&mut self) -> Result<()> {
        while self.buffer.is_empty() && !self.done {
            let request = match self.next_token.take() {
                Some(token) => PageRequest::Token(token),
                None if !self.started => PageRequest::Initial(self.filters.clone()),
                None => {
                    self.done = true;
                    return Ok(());
                }
            };
            let page = self.fetcher.fetch_page(&request).await?;
            self.started = true;
            self.consume_page(page)?;
        }
        Ok(())
    }

    fn consume_page(&mut self, page: RawPage) -> Result<()> {
        self.next_token = page.next_token;
        if page.entries.is_empty() && self.next_token.is_none() {
            self.done = true;
            return Ok(());
        }
        for entry in page.entries {
            self.buffer.push_back((self.build)(entry)?);
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Send + 'static> EntityStream<T> for CursorIter<T> {
    async fn next(&mut self) -> Result<Option<T>> {
        CursorIter::next(self).await
    }

    async fn collect_remaining(&mut self) -> Result<Vec<T>> {
        CursorIter::collect_remaining(self).await
    }
}
