//! Paginated collection traversal
//!
//! The iteration engines shared by every listable resource in the SDK:
//!
//! - [`CursorIter`]: token-based paging (datalake files, dataset items).
//!   The server hands back an opaque continuation token; no total count is
//!   known in advance.
//! - [`OffsetIter`]: offset/limit paging (channels, datasets, training
//!   entities). Every page response reports the total matching count, which
//!   enables [`OffsetIter::size`] and an exact, no-wasted-request stop.
//! - [`Prefetch`]: bounded concurrent materialization (typically a payload
//!   download) over either engine, yielding results in completion order.
//!
//! Both engines are parameterized by a [`PageFetcher`] (one HTTP list call)
//! and an entity-builder closure (pure construction, no I/O), so they are
//! directly testable with fake fetchers.

mod cursor;
mod offset;
mod prefetch;
mod types;

pub use cursor::CursorIter;
pub use offset::{OffsetIter, DEFAULT_PAGE_LIMIT};
pub use prefetch::{Prefetch, DEFAULT_PREFETCH_WORKERS};
pub use types::{EntityBuilder, EntityStream, ListFilters, PageFetcher, PageRequest, RawPage};
