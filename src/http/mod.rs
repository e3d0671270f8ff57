//! HTTP transport for the Basin API
//!
//! Provides `ApiClient`, a reqwest-based client that handles:
//! - Bearer-token authentication
//! - Automatic retries with configurable backoff
//! - Response body parsing and error classification
//! - Raw byte downloads via the `Downloader` capability

mod client;

pub use client::{ApiClient, Downloader, RequestConfig};

#[cfg(test)]
mod tests;
