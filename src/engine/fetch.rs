//! Fetch collaborator
//!
//! The engine never talks to the network itself. It calls a [`FolderSource`],
//! which turns tokens into listings. Implementations decide retries and
//! timeouts; the engine treats every failure the same way.

use crate::entry::FileEntry;
use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failures reported by a [`FolderSource`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Connection or protocol failure
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials missing, expired or rejected
    #[error("Not authorized")]
    Unauthorized,

    /// The token does not address a folder the source knows
    #[error("Folder not found: {0}")]
    NotFound(String),

    /// Local I/O failure while reading a listing
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Token-addressed filesystem the engine reads listings from
#[async_trait]
pub trait FolderSource: Send + Sync {
    /// Resolve the token of the filesystem root
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the root cannot be resolved.
    async fn fetch_root_token(&self) -> Result<String, SourceError>;

    /// List the direct children of the folder addressed by `token`
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the listing cannot be fetched.
    async fn fetch_folder_contents(&self, token: &str) -> Result<Vec<FileEntry>, SourceError>;
}
