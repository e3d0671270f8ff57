//! Common types used throughout the Basin client
//!
//! Shared type aliases and small utility types used across modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Backoff
// ============================================================================

/// Backoff strategy for transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Fixed delay between retries
    Constant,
    /// Delay grows linearly with the attempt number
    Linear,
    /// Delay doubles with each attempt
    #[default]
    Exponential,
}
