//! Cache-specific error types
//!
//! - **`AlreadyCached`**: `create` was called for a token that already has a
//!   page. Callers must `invalidate` first; hitting this means the navigation
//!   bookkeeping is wrong.
//! - **`NotCached`**: `get` was called for a token with no page.

use thiserror::Error;

/// Folder cache errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A page for this token is already cached
    #[error("Folder already cached: {0}")]
    AlreadyCached(String),

    /// No page is cached for this token
    #[error("Folder not cached: {0}")]
    NotCached(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
