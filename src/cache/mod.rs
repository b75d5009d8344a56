//! Per-folder page cache
//!
//! Maps a folder token to the realized [`Page`] of that folder. Entries are
//! independent of the navigation stack: a page popped off the stack stays
//! cached so re-entering the folder needs no fetch.
//!
//! The cache never overwrites silently. [`FolderCache::create`] refuses a
//! token that is already present, so every replacement is an explicit
//! `invalidate` followed by `create`. There is no eviction; the cache holds
//! listing metadata for every folder visited during the process lifetime.

mod error;

pub use error::CacheError;

use crate::stack::Page;
use std::collections::HashMap;
use tracing::debug;

/// Token-keyed store of realized pages
#[derive(Debug, Default, Clone)]
pub struct FolderCache {
    entries: HashMap<String, Page>,
}

impl FolderCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `page` under `token`
    ///
    /// # Errors
    ///
    /// Returns `CacheError::AlreadyCached` if the token is already present.
    pub fn create(&mut self, token: &str, page: Page) -> Result<(), CacheError> {
        if self.entries.contains_key(token) {
            return Err(CacheError::AlreadyCached(token.to_string()));
        }
        debug!(token, entries = page.entries.len(), "cached folder page");
        self.entries.insert(token.to_string(), page);
        Ok(())
    }

    /// Drop the page stored under `token`, if any
    ///
    /// An absent token is not an error.
    pub fn invalidate(&mut self, token: &str) -> Option<Page> {
        let removed = self.entries.remove(token);
        if removed.is_none() {
            debug!(token, "invalidate on uncached folder");
        }
        removed
    }

    /// Look up the page stored under `token`
    ///
    /// # Errors
    ///
    /// Returns `CacheError::NotCached` if the token is absent.
    pub fn get(&self, token: &str) -> Result<&Page, CacheError> {
        self.entries
            .get(token)
            .ok_or_else(|| CacheError::NotCached(token.to_string()))
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached tokens, sorted for stable diagnostics output
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    /// Drop every cached page
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(token: &str) -> Page {
        Page::new(token, Vec::new(), 1)
    }

    #[test]
    fn test_create_then_get() {
        let mut cache = FolderCache::new();
        cache.create("a", page("a")).unwrap();

        let cached = cache.get("a").unwrap();
        assert_eq!(cached.folder_token, "a");
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("a"));
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let mut cache = FolderCache::new();
        cache.create("a", page("a")).unwrap();

        let err = cache.create("a", Page::new("a", Vec::new(), 7)).unwrap_err();
        assert_eq!(err, CacheError::AlreadyCached("a".to_string()));
        assert_eq!(cache.get("a").unwrap().level, 1);
    }

    #[test]
    fn test_invalidate_then_create() {
        let mut cache = FolderCache::new();
        cache.create("a", page("a")).unwrap();

        let removed = cache.invalidate("a");
        assert_eq!(removed.map(|p| p.folder_token), Some("a".to_string()));
        assert!(cache.create("a", Page::new("a", Vec::new(), 2)).is_ok());
        assert_eq!(cache.get("a").unwrap().level, 2);
    }

    #[test]
    fn test_invalidate_absent_is_not_error() {
        let mut cache = FolderCache::new();
        assert!(cache.invalidate("missing").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_absent() {
        let cache = FolderCache::new();
        match cache.get("missing") {
            Err(CacheError::NotCached(token)) => assert_eq!(token, "missing"),
            other => panic!("Expected NotCached, got {other:?}"),
        }
    }

    #[test]
    fn test_tokens_sorted() {
        let mut cache = FolderCache::new();
        for token in ["c", "a", "b"] {
            cache.create(token, page(token)).unwrap();
        }
        assert_eq!(cache.tokens(), vec!["a", "b", "c"]);

        cache.clear();
        assert!(cache.is_empty());
    }
}
