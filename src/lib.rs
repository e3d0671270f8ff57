//! # Basin Client
//!
//! Rust client SDK for the Basin machine-learning platform.
//!
//! ## Features
//!
//! - **Datalake**: channel and file management, metadata headers, bulk
//!   directory upload
//! - **Datasets**: dataset and item management with payload downloads
//! - **Training**: job definitions, versions, jobs, and models
//! - **Lazy pagination**: cursor and offset/sized iterators that fetch
//!   pages on demand, plus a bounded concurrent prefetch mode for bulk
//!   content downloads
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use basin_client::{BasinClient, ListFilters, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Reads BASIN_API_URL, BASIN_AUTH_TOKEN, BASIN_ORGANIZATION_ID
//!     let client = BasinClient::from_env()?;
//!
//!     // Lazily iterate the files of a channel
//!     let mut files = client.datalake().list_files("raw-images", ListFilters::new());
//!     while let Some(file) = files.next().await? {
//!         println!("{}", file.file_id);
//!     }
//!
//!     // Bulk-download with 5 concurrent workers, completion order
//!     let mut downloads =
//!         client
//!             .datalake()
//!             .list_files_content("raw-images", ListFilters::new(), 5);
//!     while let Some(fetched) = downloads.next().await {
//!         let content = fetched?;
//!         println!("{} ({} bytes)", content.file.file_id, content.data.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration and environment loading
pub mod config;

/// HTTP transport with retry and backoff
pub mod http;

/// Paginated collection iteration (cursor, offset, prefetch)
pub mod paging;

/// Datalake APIs: channels and files
pub mod datalake;

/// Dataset APIs: datasets and items
pub mod dataset;

/// Training APIs: job definitions, versions, jobs, models
pub mod training;

/// Top-level platform client
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::BasinClient;
pub use config::ClientConfig;
pub use error::{Error, Result, ResultExt};
pub use types::*;

// Re-export commonly used paging types
pub use paging::{CursorIter, EntityStream, ListFilters, OffsetIter, Prefetch};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
