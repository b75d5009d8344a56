//! Testing utilities for folder-pager
//!
//! Provides [`MockSource`], a scripted in-memory [`FolderSource`] that counts
//! fetches, injects failures and can hold a fetch open until the test
//! releases it.
//!
//! # Examples
//! ```
//! # use folder_pager::testing::MockSource;
//! # use folder_pager::entry::FileEntry;
//! let source = MockSource::new("R");
//! source.set_listing("R", vec![FileEntry::root("a")]);
//! assert_eq!(source.fetch_count("R"), 0);
//! ```

use crate::engine::{FolderSource, SourceError};
use crate::entry::{EntryKind, FileEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct MockState {
    root: Option<Result<String, SourceError>>,
    listings: HashMap<String, Result<Vec<FileEntry>, SourceError>>,
    fetches: HashMap<String, usize>,
    root_fetches: usize,
    holds: HashMap<String, Arc<Notify>>,
}

/// Scripted in-memory folder source
///
/// Clones share state, so a test can keep one clone for assertions while
/// the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    state: Arc<Mutex<MockState>>,
}

impl MockSource {
    /// Create a source whose root token is `root`
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        let source = Self::default();
        source.lock().root = Some(Ok(root.into()));
        source
    }

    /// Answer fetches of `token` with `entries`
    pub fn set_listing(&self, token: impl Into<String>, entries: Vec<FileEntry>) {
        self.lock().listings.insert(token.into(), Ok(entries));
    }

    /// Fail fetches of `token` with `error`
    pub fn fail_listing(&self, token: impl Into<String>, error: SourceError) {
        self.lock().listings.insert(token.into(), Err(error));
    }

    /// Fail root resolution with `error`
    pub fn fail_root(&self, error: SourceError) {
        self.lock().root = Some(Err(error));
    }

    /// Hold fetches of `token` until the returned handle is notified
    ///
    /// The fetch is counted before it starts waiting.
    #[must_use]
    pub fn hold(&self, token: impl Into<String>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().holds.insert(token.into(), Arc::clone(&gate));
        gate
    }

    /// Number of listing fetches issued for `token`
    #[must_use]
    pub fn fetch_count(&self, token: &str) -> usize {
        self.lock().fetches.get(token).copied().unwrap_or(0)
    }

    /// Number of listing fetches issued for all tokens
    #[must_use]
    pub fn total_fetches(&self) -> usize {
        self.lock().fetches.values().sum()
    }

    /// Number of root-token resolutions
    #[must_use]
    pub fn root_fetches(&self) -> usize {
        self.lock().root_fetches
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FolderSource for MockSource {
    async fn fetch_root_token(&self) -> Result<String, SourceError> {
        let mut state = self.lock();
        state.root_fetches += 1;
        state
            .root
            .clone()
            .unwrap_or_else(|| Err(SourceError::NotFound("root".to_string())))
    }

    async fn fetch_folder_contents(&self, token: &str) -> Result<Vec<FileEntry>, SourceError> {
        let gate = {
            let mut state = self.lock();
            *state.fetches.entry(token.to_string()).or_insert(0) += 1;
            state.holds.get(token).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.lock()
            .listings
            .get(token)
            .cloned()
            .unwrap_or_else(|| Err(SourceError::NotFound(token.to_string())))
    }
}

/// Timestamp `secs` seconds after the Unix epoch
///
/// # Panics
///
/// Panics if `secs` is outside chrono's representable range.
#[must_use]
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("timestamp out of range")
}

/// Folder entry named after its token
#[must_use]
pub fn folder(token: &str, parent: &str) -> FileEntry {
    FileEntry::new(token, parent, token, EntryKind::Folder, timestamp(0))
}

/// File entry named after its token
#[must_use]
pub fn file(token: &str, parent: &str) -> FileEntry {
    FileEntry::new(token, parent, token, EntryKind::File, timestamp(0))
}
