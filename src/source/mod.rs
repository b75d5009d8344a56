//! Local directory source
//!
//! Exposes a directory tree as a token-addressed filesystem so the engine can
//! be driven without a remote server. Tokens are canonical path strings; the
//! root token is the canonical root directory. Tokens outside the root are
//! refused.

use crate::engine::{FolderSource, SourceError};
use crate::entry::{EntryKind, FileEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

/// [`FolderSource`] backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
    show_hidden: bool,
}

impl LocalSource {
    /// Open `root` as the filesystem root
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Io` if `root` cannot be canonicalized and
    /// `SourceError::NotFound` if it is not a directory.
    pub fn new(root: impl AsRef<Path>, show_hidden: bool) -> Result<Self, SourceError> {
        let root = std::fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(SourceError::NotFound(root.display().to_string()));
        }
        Ok(Self { root, show_hidden })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn token_for(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    async fn resolve(&self, token: &str) -> Result<PathBuf, SourceError> {
        let path = tokio::fs::canonicalize(token)
            .await
            .map_err(|_| SourceError::NotFound(token.to_string()))?;
        if !path.starts_with(&self.root) {
            return Err(SourceError::NotFound(token.to_string()));
        }
        Ok(path)
    }
}

#[async_trait]
impl FolderSource for LocalSource {
    async fn fetch_root_token(&self) -> Result<String, SourceError> {
        Ok(Self::token_for(&self.root))
    }

    async fn fetch_folder_contents(&self, token: &str) -> Result<Vec<FileEntry>, SourceError> {
        let folder = self.resolve(token).await?;
        let parent_token = Self::token_for(&folder);
        let mut reader = tokio::fs::read_dir(&folder).await?;
        let mut entries = Vec::new();

        while let Some(dir_entry) = reader.next_entry().await? {
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }
            let path = dir_entry.path();
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            let kind = if metadata.is_dir() {
                EntryKind::Folder
            } else {
                EntryKind::File
            };
            let last_modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

            entries.push(FileEntry::new(
                Self::token_for(&path),
                parent_token.as_str(),
                name,
                kind,
                last_modified,
            ));
        }

        debug!(folder = %folder.display(), entries = entries.len(), "listed local folder");
        Ok(entries)
    }
}
