//! Engine error types
//!
//! - **`Fetch`**: the fetch collaborator failed. Routine; the engine state is
//!   left untouched and the error goes to the observer.
//! - **`Cache`**: cache bookkeeping was violated. A defect, returned to the
//!   caller so it is not lost.
//! - **`LevelOutOfRange`** / **`NotAFolder`**: the request itself was invalid.
//! - **`Stopped`**: the engine task is gone.

use super::fetch::SourceError;
use crate::cache::CacheError;
use thiserror::Error;

/// Navigation engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Fetching a listing or the root token failed
    #[error("Fetch failed: {0}")]
    Fetch(#[from] SourceError),

    /// Cache bookkeeping violation
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Requested stack level does not exist
    #[error("Level {level} out of range (stack depth {depth})")]
    LevelOutOfRange { level: usize, depth: usize },

    /// Only folders can be explored
    #[error("Not a folder: {0}")]
    NotAFolder(String),

    /// The engine task has shut down
    #[error("Navigation engine stopped")]
    Stopped,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
