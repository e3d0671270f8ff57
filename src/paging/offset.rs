//! Offset/limit pagination engine with a size contract

use super::prefetch::Prefetch;
use super::types::{EntityBuilder, EntityStream, ListFilters, PageFetcher, PageRequest};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

/// Default page size for offset-mode listings
pub const DEFAULT_PAGE_LIMIT: u64 = 50;

/// Lazy iterator over a collection addressed by numeric offset/limit
///
/// Every page response reports the total matching count, so this iterator
/// additionally offers [`size`](OffsetIter::size), and it stops exactly when
/// the running offset reaches the total, without the wasted trailing
/// request the cursor engine cannot avoid.
///
/// Same consumption semantics as [`CursorIter`](super::CursorIter):
/// single-pass, first page fetched lazily, partial pulls and bulk drains
/// interoperate without loss or duplication.
pub struct OffsetIter<T> {
    fetcher: Arc<dyn PageFetcher>,
    build: EntityBuilder<T>,
    filters: ListFilters,
    limit: u64,
    /// Count of entities yielded so far; also the next fetch position
    offset: u64,
    /// Fixed once learned from the first response
    total: Option<u64>,
    buffer: VecDeque<T>,
    done: bool,
}

impl<T: Send + 'static> OffsetIter<T> {
    /// Create an iterator bound to fixed request parameters
    pub fn new(fetcher: Arc<dyn PageFetcher>, build: EntityBuilder<T>, filters: ListFilters) -> Self {
        let limit = filters.items_per_page.unwrap_or(DEFAULT_PAGE_LIMIT);
        Self {
            fetcher,
            build,
            filters,
            limit,
            offset: 0,
            total: None,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Total number of matching entities
    ///
    /// Triggers the first page fetch if it has not happened yet; the total
    /// is cached for the lifetime of the iterator and never re-fetched. The
    /// fetched page is buffered, so iterating afterwards issues no
    /// redundant request.
    pub async fn size(&mut self) -> Result<u64> {
        if self.total.is_none() {
            self.advance().await?;
        }
        self.total
            .ok_or_else(|| Error::decode("list response missing total count"))
    }

    /// Pull the next entity; `Ok(None)` once exhausted
    pub async fn next(&mut self) -> Result<Option<T>> {
        if self.buffer.is_empty() {
            self.advance().await?;
        }
        match self.buffer.pop_front() {
            Some(item) => {
                self.offset += 1;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    /// Return the next batch of entities
    ///
    /// Unconsumed entries of the current page are served directly without a
    /// fetch. Returns an empty vec once exhausted.
    pub async fn next_page(&mut self) -> Result<Vec<T>> {
        if self.buffer.is_empty() {
            self.advance().await?;
        }
        let items: Vec<T> = self.buffer.drain(..).collect();
        self.offset += items.len() as u64;
        Ok(items)
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

    /// Switch to eager concurrent materialization (completion order)
    pub fn prefetch<U, F, Fut>(self, workers: usize, materialize: F) -> Prefetch<T, U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U>> + Send + 'static,
    {
        Prefetch::new(Box::new(self), workers, materialize)
    }

    /// Fetch the page at the current offset, unless the running offset has
    /// reached the known total.
    async fn advance(&mut self) -> Result<()> {
        if self.done {
            return Ok(());
        }
        if let Some(total) = self.total {
            if self.offset >= total {
                self.done = true;
                return Ok(());
            }
        }
        let request = PageRequest::Offset {
            offset: self.offset,
            limit: self.limit,
            filters: self.filters.clone(),
        };
        let page = self.fetcher.fetch_page(&request).await?;
        let total = page
            .total
            .ok_or_else(|| Error::decode("list response missing total count"))?;
        if self.total.is_none() {
            self.total = Some(total);
        }
        if page.entries.is_empty() {
            // Server returned fewer records than its own total promised;
            // stop rather than loop on the same offset.
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
impl<T: Send + 'static> EntityStream<T> for OffsetIter<T> {
    async fn next(&mut self) -> Result<Option<T>> {
        OffsetIter::next(self).await
    }

    async fn collect_remaining(&mut self) -> Result<Vec<T>> {
        OffsetIter::collect_remaining(self).await
    }
}
