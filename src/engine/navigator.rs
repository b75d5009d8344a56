//! Synchronous navigation state machine
//!
//! [`Navigator`] owns the stack, the cache and the current sort state, and
//! performs every mutation of them. It never awaits: when a folder must be
//! fetched it hands out a [`FetchTicket`] instead and applies the listing
//! later through [`Navigator::complete_fetch`]. Until then nothing is
//! mutated, so a failed or superseded fetch leaves the state exactly as it
//! was.
//!
//! # Supersession
//!
//! Each navigation request (`explore`, `begin_root`) advances an epoch.
//! Tickets carry the epoch they were issued under; a ticket from an older
//! epoch is discarded on completion.
//!
//! ```text
//! explore(folder, level, force)
//!     ├─ folder open below `level` (and not forced)  → truncate        → Unchanged / Reused
//!     ├─ folder cached (and not forced)               → truncate, push  → Reused
//!     └─ otherwise                                    → FetchTicket
//!                                                         ↓
//!                                          complete_fetch(ticket, listing)
//!                                              ├─ stale epoch → Superseded
//!                                              └─ purge (forced), truncate, sort, cache, push
//! ```

use super::error::EngineError;
use crate::cache::FolderCache;
use crate::entry::FileEntry;
use crate::sort::{self, SortMode};
use crate::stack::{NavigationStack, Page};
use std::collections::HashSet;
use tracing::debug;

/// Pending listing fetch for one explore request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Folder to fetch
    pub token: String,
    /// Stack level the request was made at
    pub requested_level: usize,
    /// Whether the request bypasses the cache
    pub force_refresh: bool,
    epoch: u64,
}

/// Pending root-token resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootTicket {
    epoch: u64,
}

/// Result of starting an explore request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreStep {
    /// Nothing changed
    Unchanged,
    /// The stack changed without a fetch (truncation or cache hit)
    Reused,
    /// The folder must be fetched before the stack changes
    Fetch(FetchTicket),
}

/// Result of applying a fetched listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The page was realized and pushed
    Applied,
    /// A newer navigation request made this fetch obsolete
    Superseded,
}

/// Owner of the navigation stack, folder cache and sort state
#[derive(Debug, Default)]
pub struct Navigator {
    stack: NavigationStack,
    cache: FolderCache,
    sort_mode: SortMode,
    reversed: bool,
    epoch: u64,
}

impl Navigator {
    /// Create an empty navigator using `sort_mode`/`reversed` for new pages
    #[must_use]
    pub fn new(sort_mode: SortMode, reversed: bool) -> Self {
        Self {
            sort_mode,
            reversed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        self.stack.pages()
    }

    #[must_use]
    pub const fn open_tokens(&self) -> &HashSet<String> {
        self.stack.open_tokens()
    }

    #[must_use]
    pub const fn cache(&self) -> &FolderCache {
        &self.cache
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Current sort mode and reversal flag
    #[must_use]
    pub const fn sort_state(&self) -> (SortMode, bool) {
        (self.sort_mode, self.reversed)
    }

    /// Whether `epoch` still belongs to the latest navigation request
    #[must_use]
    pub const fn is_current(&self, ticket_epoch: u64) -> bool {
        self.epoch == ticket_epoch
    }

    #[must_use]
    pub const fn ticket_is_current(&self, ticket: &FetchTicket) -> bool {
        self.is_current(ticket.epoch)
    }

    #[must_use]
    pub const fn root_is_current(&self, ticket: RootTicket) -> bool {
        self.is_current(ticket.epoch)
    }

    /// Start navigating to `folder` at `requested_level`
    ///
    /// Keeps the first `requested_level` pages and then shows `folder`. An
    /// already-open folder within those pages is left as is; a cached folder
    /// is pushed straight from the cache; anything else (and every forced
    /// refresh) needs a fetch.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotAFolder` for file entries.
    pub fn explore(
        &mut self,
        folder: &FileEntry,
        requested_level: usize,
        force_refresh: bool,
    ) -> Result<ExploreStep, EngineError> {
        if !folder.is_folder() {
            return Err(EngineError::NotAFolder(folder.token.clone()));
        }
        self.epoch += 1;
        let token = folder.token.as_str();

        if !force_refresh {
            if self.open_within(token, requested_level) {
                let popped = self.stack.truncate_to_level(requested_level);
                debug!(token, requested_level, "folder already open");
                return Ok(if popped.is_empty() {
                    ExploreStep::Unchanged
                } else {
                    ExploreStep::Reused
                });
            }

            if let Ok(cached) = self.cache.get(token) {
                let page = cached.clone();
                self.stack.truncate_to_level(requested_level);
                debug!(token, requested_level, "cache hit");
                self.stack.push(page);
                return Ok(ExploreStep::Reused);
            }
        }

        debug!(token, requested_level, force_refresh, "cache miss, fetch required");
        Ok(ExploreStep::Fetch(FetchTicket {
            token: token.to_string(),
            requested_level,
            force_refresh,
            epoch: self.epoch,
        }))
    }

    /// Start a root navigation; the returned ticket is redeemed with
    /// [`Navigator::resolve_root`] once the root token is known
    pub fn begin_root(&mut self) -> RootTicket {
        self.epoch += 1;
        RootTicket { epoch: self.epoch }
    }

    /// Continue a root navigation with the resolved `token`
    ///
    /// Explores the root at level 0, bypassing the cache unless the root is
    /// already cached. Returns `None` when a newer request superseded the
    /// root navigation.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Navigator::explore`].
    pub fn resolve_root(
        &mut self,
        ticket: RootTicket,
        token: &str,
    ) -> Result<Option<ExploreStep>, EngineError> {
        if !self.root_is_current(ticket) {
            debug!(token, "discarding superseded root resolution");
            return Ok(None);
        }
        let root = FileEntry::root(token);
        let force = !self.cache.contains(token);
        self.explore(&root, 0, force).map(Some)
    }

    /// Apply a fetched listing for `ticket`
    ///
    /// Sorts the listing with the current sort state, caches the page and
    /// pushes it after truncating to the requested level.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Cache` if the folder was cached behind the
    /// ticket's back; the state is left unchanged in that case.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        listing: Vec<FileEntry>,
    ) -> Result<Completion, EngineError> {
        if !self.ticket_is_current(&ticket) {
            debug!(token = %ticket.token, "discarding superseded fetch");
            return Ok(Completion::Superseded);
        }
        let FetchTicket {
            token,
            requested_level,
            force_refresh,
            ..
        } = ticket;

        if force_refresh {
            self.stack.purge(&token);
            self.cache.invalidate(&token);
        }

        let level = self.stack.depth().min(requested_level) + 1;
        let entries = sort::sort(listing, self.sort_mode, self.reversed);
        let page = Page::new(token.as_str(), entries, level);
        self.cache.create(&token, page.clone())?;

        self.stack.truncate_to_level(requested_level);
        debug!(token = %token, level, entries = page.entries.len(), "realized page");
        self.stack.push(page);
        Ok(Completion::Applied)
    }

    /// Re-sort the page at 0-based `target_level`
    ///
    /// Updates the current sort state, re-sorts that page only and replaces
    /// its cache entry with the new ordering.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::LevelOutOfRange` if no page exists at
    /// `target_level`; nothing changes in that case.
    pub fn sort(
        &mut self,
        mode: SortMode,
        reversed: bool,
        target_level: usize,
    ) -> Result<(), EngineError> {
        let depth = self.stack.depth();
        let Some(page) = self.stack.page_mut(target_level) else {
            return Err(EngineError::LevelOutOfRange {
                level: target_level,
                depth,
            });
        };

        self.sort_mode = mode;
        self.reversed = reversed;

        let entries = std::mem::take(&mut page.entries);
        page.entries = sort::sort(entries, mode, reversed);
        let updated = page.clone();

        self.cache.invalidate(&updated.folder_token);
        let token = updated.folder_token.clone();
        self.cache.create(&token, updated)?;
        debug!(token = %token, %mode, reversed, target_level, "re-sorted page");
        Ok(())
    }

    /// Whether `token` is open among the first `requested_level` pages
    fn open_within(&self, token: &str, requested_level: usize) -> bool {
        self.stack.contains(token)
            && self
                .stack
                .pages()
                .iter()
                .take(requested_level)
                .any(|p| p.folder_token == token)
    }
}
