//! Domain Layer - Error Taxonomy
//!
//! Errors are plain data so UI layers can serialize and display them.
//! Validation and NotFound are detected locally and never involve the
//! store; Fetch, Persist and Upload wrap store or transport failures.

use serde::{Deserialize, Serialize};

/// Common result type for feed and store operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Feed-level errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FeedError {
    /// A draft failed required-field checks before any store call
    Validation(String),
    /// Loading the item list from the store failed
    Fetch(String),
    /// An insert or update against the store failed
    Persist(String),
    /// Storing an asset or resolving its URL failed
    Upload(String),
    /// The referenced local item does not exist or is already resolved
    NotFound(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            FeedError::Fetch(msg) => write!(f, "Fetch failed: {}", msg),
            FeedError::Persist(msg) => write!(f, "Persist failed: {}", msg),
            FeedError::Upload(msg) => write!(f, "Upload failed: {}", msg),
            FeedError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for FeedError {}
