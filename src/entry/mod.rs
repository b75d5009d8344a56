//! Filesystem node definitions
//!
//! A [`FileEntry`] is one node of the remote filesystem as the client sees it.
//! Nodes are addressed by an opaque token which is stable across fetches and
//! is the only field used for identity: two entries with the same token are
//! the same node, whatever their names say.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Discriminant for filesystem nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file, not navigable
    File,
    /// Folder, can be explored into a page
    Folder,
}

impl EntryKind {
    /// Canonical string form, also used as the sort key for kind ordering
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Folder => "Folder",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filesystem node
///
/// Equality and hashing only look at `token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Globally unique identifier, the cache and stack key
    pub token: String,

    /// Token of the containing folder
    pub parent_token: String,

    /// Raw name as delivered by the server (may contain legacy path separators)
    pub name: String,

    /// File or folder
    pub kind: EntryKind,

    /// Last modification time
    pub last_modified: DateTime<Utc>,
}

impl FileEntry {
    /// Create a new entry
    #[must_use]
    pub fn new(
        token: impl Into<String>,
        parent_token: impl Into<String>,
        name: impl Into<String>,
        kind: EntryKind,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            parent_token: parent_token.into(),
            name: name.into(),
            kind,
            last_modified,
        }
    }

    /// Convenience constructor for folders
    #[must_use]
    pub fn folder(
        token: impl Into<String>,
        parent_token: impl Into<String>,
        name: impl Into<String>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self::new(token, parent_token, name, EntryKind::Folder, last_modified)
    }

    /// Convenience constructor for files
    #[must_use]
    pub fn file(
        token: impl Into<String>,
        parent_token: impl Into<String>,
        name: impl Into<String>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self::new(token, parent_token, name, EntryKind::File, last_modified)
    }

    /// Entry standing in for the filesystem root once its token is resolved
    #[must_use]
    pub fn root(token: impl Into<String>) -> Self {
        Self::folder(token, "", "/", DateTime::<Utc>::UNIX_EPOCH)
    }

    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, EntryKind::Folder)
    }

    /// Name reduced to its last path segment, for display only
    ///
    /// Legacy listings may carry names like `photos/2019/beach.jpg`; the UI
    /// shows `beach.jpg`. Trailing separators are ignored so `"docs/"`
    /// displays as `docs`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim_end_matches(['/', '\\']);
        match trimmed.rsplit(['/', '\\']).next() {
            Some(segment) if !segment.is_empty() => segment,
            _ => &self.name,
        }
    }
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for FileEntry {}

impl Hash for FileEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_display_name_strips_legacy_path() {
        let entry = FileEntry::file("t1", "p", "photos/2019/beach.jpg", at(0));
        assert_eq!(entry.display_name(), "beach.jpg");
    }

    #[test]
    fn test_display_name_backslash_and_trailing_separator() {
        let entry = FileEntry::folder("t1", "p", "legacy\\docs\\", at(0));
        assert_eq!(entry.display_name(), "docs");
    }

    #[test]
    fn test_display_name_plain() {
        let entry = FileEntry::file("t1", "p", "notes.txt", at(0));
        assert_eq!(entry.display_name(), "notes.txt");
    }

    #[test]
    fn test_display_name_only_separators_falls_back() {
        let entry = FileEntry::root("R");
        assert_eq!(entry.display_name(), "/");
    }

    #[test]
    fn test_identity_is_token_only() {
        let a = FileEntry::file("same", "p1", "a.txt", at(1));
        let b = FileEntry::folder("same", "p2", "b", at(2));
        assert_eq!(a, b);

        let set: HashSet<FileEntry> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_name_never_used_for_identity() {
        let a = FileEntry::file("t1", "p", "same.txt", at(1));
        let b = FileEntry::file("t2", "p", "same.txt", at(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_string_form() {
        assert_eq!(EntryKind::File.as_str(), "File");
        assert_eq!(EntryKind::Folder.to_string(), "Folder");
        assert!(EntryKind::File.as_str() < EntryKind::Folder.as_str());
    }

    #[test]
    fn test_root_is_folder() {
        let root = FileEntry::root("R");
        assert!(root.is_folder());
        assert_eq!(root.token, "R");
        assert!(root.parent_token.is_empty());
    }
}
