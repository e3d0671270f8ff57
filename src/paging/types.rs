//! Paging types and collaborator seams

use crate::error::Result;
use crate::types::JsonValue;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

// ============================================================================
// Raw Page
// ============================================================================

/// One server response to a list call
///
/// Immutable once returned; ownership moves to the iterator that requested
/// it. Cursor-mode pages carry a continuation token (`None` = no more
/// pages); offset-mode pages carry the total matching count instead.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Raw records, in server order. Possibly empty.
    pub entries: Vec<JsonValue>,
    /// Continuation token (cursor mode)
    pub next_token: Option<String>,
    /// Total matching records (offset mode)
    pub total: Option<u64>,
}

impl RawPage {
    /// Build a cursor-mode page
    pub fn cursor(entries: Vec<JsonValue>, next_token: Option<String>) -> Self {
        Self {
            entries,
            next_token,
            total: None,
        }
    }

    /// Build an offset-mode page
    pub fn sized(entries: Vec<JsonValue>, total: u64) -> Self {
        Self {
            entries,
            next_token: None,
            total: Some(total),
        }
    }
}

// ============================================================================
// List Filters
// ============================================================================

/// Paging filters passed through verbatim to the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    /// Page size requested from the server
    pub items_per_page: Option<u64>,
    /// Free-text query
    pub query: Option<String>,
    /// Start of the date range (inclusive)
    pub start: Option<NaiveDate>,
    /// End of the date range (inclusive)
    pub end: Option<NaiveDate>,
    /// Sort specification (e.g. "-uploaded_at")
    pub sort: Option<String>,
    /// Explicit continuation token to start from. Mutually exclusive with
    /// every other filter: when set, the first fetch carries only the token.
    pub token: Option<String>,
}

impl ListFilters {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested page size
    #[must_use]
    pub fn items_per_page(mut self, n: u64) -> Self {
        self.items_per_page = Some(n);
        self
    }

    /// Set a free-text query
    #[must_use]
    pub fn query(mut self, q: impl Into<String>) -> Self {
        self.query = Some(q.into());
        self
    }

    /// Set the date range
    #[must_use]
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set the sort specification
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Start from an explicit continuation token
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Render the full filter set as query parameters
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = self.filter_query();
        if let Some(n) = self.items_per_page {
            params.push(("items_per_page".to_string(), n.to_string()));
        }
        params
    }

    /// Render only the non-paging filters (offset mode carries its own
    /// offset/limit parameters)
    pub fn filter_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ref q) = self.query {
            params.push(("query".to_string(), q.clone()));
        }
        if let Some(start) = self.start {
            params.push(("start".to_string(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            params.push(("end".to_string(), end.format("%Y-%m-%d").to_string()));
        }
        if let Some(ref sort) = self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}

// ============================================================================
// Page Request
// ============================================================================

/// What the iteration engine hands a [`PageFetcher`]
///
/// The server contract makes a continuation token mutually exclusive with
/// every other filter parameter; encoding the request as an enum makes the
/// invalid combination unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// First fetch: the full filter set
    Initial(ListFilters),
    /// Continuation fetch: the token and nothing else
    Token(String),
    /// Offset-mode fetch
    Offset {
        offset: u64,
        limit: u64,
        filters: ListFilters,
    },
}

impl PageRequest {
    /// Render the request as query parameters
    pub fn to_query(&self) -> Vec<(String, String)> {
        match self {
            Self::Initial(filters) => filters.to_query(),
            Self::Token(token) => vec![("next_page_token".to_string(), token.clone())],
            Self::Offset {
                offset,
                limit,
                filters,
            } => {
                let mut params = vec![
                    ("offset".to_string(), offset.to_string()),
                    ("limit".to_string(), limit.to_string()),
                ];
                params.extend(filters.filter_query());
                params
            }
        }
    }
}

// ============================================================================
// Collaborator Seams
// ============================================================================

/// One HTTP list call against a resource's paginated endpoint
///
/// Implementations translate a [`PageRequest`] into query parameters and the
/// typed response body into a [`RawPage`]. Retry, auth, and the wire schema
/// all live behind this seam; the engines never see them.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage>;
}

/// Pure constructor turning one raw page entry into a typed entity. No I/O.
pub type EntityBuilder<T> = Arc<dyn Fn(JsonValue) -> Result<T> + Send + Sync>;

/// A lazy, forward-only, single-pass sequence of entities
///
/// `Ok(None)` is the exhausted signal, not a failure. Implemented by both
/// iteration engines; the prefetch executor consumes any implementor.
#[async_trait]
pub trait EntityStream<T: Send>: Send {
    /// Pull the next entity, fetching a new page if the current one is
    /// fully consumed
    async fn next(&mut self) -> Result<Option<T>>;

    /// Drain every remaining entity, in server order
    ///
    /// Interoperates with prior `next` calls: draining after partial pulls
    /// continues from the exact unconsumed position.
    async fn collect_remaining(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}
