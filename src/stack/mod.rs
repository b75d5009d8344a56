//! Visible page stack
//!
//! The stack is the breadcrumb trail the UI pages through horizontally:
//! index 0 is the root folder, the last page is the active leaf. A token set
//! mirrors the stack so membership checks are O(1).
//!
//! The set always equals the tokens of the pages on the stack. Every mutation
//! goes through this module, which keeps both sides in step.

use crate::entry::FileEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Realized, sorted listing of one folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Folder displayed by this page
    pub folder_token: String,

    /// Current (sorted) contents
    pub entries: Vec<FileEntry>,

    /// 1-based stack position at realization time, for diagnostics only
    pub level: usize,
}

impl Page {
    #[must_use]
    pub fn new(folder_token: impl Into<String>, entries: Vec<FileEntry>, level: usize) -> Self {
        Self {
            folder_token: folder_token.into(),
            entries,
            level,
        }
    }

    /// Navigable children of this page
    pub fn folders(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| e.is_folder())
    }
}

/// Ordered pages plus the set of their tokens
#[derive(Debug, Default, Clone)]
pub struct NavigationStack {
    pages: Vec<Page>,
    open_tokens: HashSet<String>,
}

impl NavigationStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages on the stack
    #[must_use]
    pub fn depth(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub const fn open_tokens(&self) -> &HashSet<String> {
        &self.open_tokens
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.open_tokens.contains(token)
    }

    /// Page at 0-based `index`
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Active (deepest) page
    #[must_use]
    pub fn leaf(&self) -> Option<&Page> {
        self.pages.last()
    }

    /// Append `page` and register its token
    ///
    /// # Panics
    ///
    /// Panics if the token is already open. Two pages for one folder would
    /// break the page/token correspondence, so this is a logic error in the
    /// caller and is not recoverable.
    pub fn push(&mut self, page: Page) {
        assert!(
            self.open_tokens.insert(page.folder_token.clone()),
            "folder {} is already open on the navigation stack",
            page.folder_token
        );
        self.pages.push(page);
        debug_assert!(self.is_consistent());
    }

    /// Pop pages until at most `requested_level` remain
    ///
    /// Exactly `depth - requested_level` pages are popped when the stack is
    /// deeper than the requested level; otherwise nothing happens. Returns the
    /// popped pages, deepest first.
    pub fn truncate_to_level(&mut self, requested_level: usize) -> Vec<Page> {
        let mut popped = Vec::new();
        while self.pages.len() > requested_level {
            let Some(page) = self.pages.pop() else {
                break;
            };
            self.open_tokens.remove(&page.folder_token);
            popped.push(page);
        }
        if !popped.is_empty() {
            debug!(popped = popped.len(), depth = self.pages.len(), "truncated navigation stack");
        }
        debug_assert!(self.is_consistent());
        popped
    }

    /// Remove `token` from the open set and every page showing it
    ///
    /// Returns the number of pages removed.
    pub fn purge(&mut self, token: &str) -> usize {
        self.open_tokens.remove(token);
        let before = self.pages.len();
        self.pages.retain(|p| p.folder_token != token);
        let removed = before - self.pages.len();
        debug_assert!(self.is_consistent());
        removed
    }

    /// Whether the token set equals the set of page tokens
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.open_tokens.len() == self.pages.len()
            && self.pages.iter().all(|p| self.open_tokens.contains(&p.folder_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(tokens: &[&str]) -> NavigationStack {
        let mut stack = NavigationStack::new();
        for (i, token) in tokens.iter().enumerate() {
            stack.push(Page::new(*token, Vec::new(), i + 1));
        }
        stack
    }

    fn page_tokens(stack: &NavigationStack) -> Vec<&str> {
        stack.pages().iter().map(|p| p.folder_token.as_str()).collect()
    }

    #[test]
    fn test_push_registers_token() {
        let stack = stack_of(&["R", "a"]);
        assert_eq!(stack.depth(), 2);
        assert!(stack.contains("R"));
        assert!(stack.contains("a"));
        assert_eq!(stack.leaf().map(|p| p.folder_token.as_str()), Some("a"));
        assert!(stack.is_consistent());
    }

    #[test]
    #[should_panic(expected = "already open")]
    fn test_push_duplicate_panics() {
        let mut stack = stack_of(&["R"]);
        stack.push(Page::new("R", Vec::new(), 2));
    }

    #[test]
    fn test_truncate_pops_exact_count() {
        let mut stack = stack_of(&["R", "a", "b", "c", "d"]);
        let popped = stack.truncate_to_level(2);

        assert_eq!(popped.len(), 3);
        assert_eq!(
            popped.iter().map(|p| p.folder_token.as_str()).collect::<Vec<_>>(),
            vec!["d", "c", "b"]
        );
        assert_eq!(page_tokens(&stack), vec!["R", "a"]);
        for token in ["b", "c", "d"] {
            assert!(!stack.contains(token));
        }
        assert!(stack.is_consistent());
    }

    #[test]
    fn test_truncate_noop_when_shallow() {
        let mut stack = stack_of(&["R", "a"]);
        assert!(stack.truncate_to_level(2).is_empty());
        assert!(stack.truncate_to_level(9).is_empty());
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_truncate_to_zero_empties() {
        let mut stack = stack_of(&["R", "a"]);
        stack.truncate_to_level(0);
        assert!(stack.is_empty());
        assert!(stack.open_tokens().is_empty());
    }

    #[test]
    fn test_purge_removes_token() {
        let mut stack = stack_of(&["R", "a", "b"]);
        assert_eq!(stack.purge("a"), 1);
        assert_eq!(page_tokens(&stack), vec!["R", "b"]);
        assert!(!stack.contains("a"));
        assert_eq!(stack.purge("missing"), 0);
        assert!(stack.is_consistent());
    }

    #[test]
    fn test_page_folders_filter() {
        use crate::entry::FileEntry;
        use chrono::DateTime;

        let t = DateTime::from_timestamp(0, 0).unwrap();
        let page = Page::new(
            "R",
            vec![FileEntry::folder("a", "R", "a", t), FileEntry::file("b", "R", "b", t)],
            1,
        );
        let folders: Vec<&str> = page.folders().map(|e| e.token.as_str()).collect();
        assert_eq!(folders, vec!["a"]);
    }
}
